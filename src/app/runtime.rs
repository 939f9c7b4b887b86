use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;

use super::{App, Message};

/// Drives an [`App`]: applies messages and polls the effects they start.
///
/// Everything runs on the caller's task. Effects make progress only while
/// [`Runtime::step`] is awaited, and their results are applied one at a time.
pub struct Runtime {
    app: App,
    in_flight: FuturesUnordered<BoxFuture<'static, Message>>,
}

impl Runtime {
    pub fn new(app: App) -> Self {
        Self {
            app,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Number of effects still waiting on I/O or timers.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn dispatch(&mut self, message: Message) {
        let command = self.app.update(message);
        self.in_flight.extend(command.into_futures());
    }

    /// Wait for the next effect to finish and apply its result.
    /// Returns false when nothing was in flight. Cancel-safe.
    pub async fn step(&mut self) -> bool {
        match self.in_flight.next().await {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }
}
