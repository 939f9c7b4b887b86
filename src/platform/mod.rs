//! Desktop collaborators: system notifications, clipboard, and dictation.
//!
//! Each is a narrow trait so the app can run headless and tests can observe
//! what would have been shown.

pub mod desktop;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    Default,
    Granted,
    Denied,
}

pub trait Notifier: Send + Sync {
    /// Ask once when the app becomes active. Returns the resulting state.
    fn request_permission(&self) -> Permission;

    fn permission(&self) -> Permission;

    /// Show a system notification. Does nothing unless permission is granted.
    fn notify(&self, title: &str, body: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardRead {
    Text(String),
    Empty,
    Denied,
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn read_text(&self) -> ClipboardRead;
}

/// Single-utterance dictation. When unsupported the control is inert.
#[async_trait]
pub trait Dictation: Send + Sync {
    fn is_available(&self) -> bool;

    async fn listen(&self) -> Option<String>;
}
