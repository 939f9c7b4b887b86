use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::message::Message;

/// Effects returned from `App::update`. Each future resolves to the message
/// that reports its result back to the app.
#[must_use]
pub struct Command {
    futures: Vec<BoxFuture<'static, Message>>,
}

impl Command {
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Message + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            futures: vec![future.map(map).boxed()],
        }
    }

    pub fn batch(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            futures: commands.into_iter().flat_map(|c| c.futures).collect(),
        }
    }

    pub fn into_futures(self) -> Vec<BoxFuture<'static, Message>> {
        self.futures
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("futures", &self.futures.len())
            .finish()
    }
}
