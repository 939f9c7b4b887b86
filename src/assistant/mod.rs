pub mod anthropic;
pub mod keyring;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::task::{AiAssistance, Priority};

/// Structured triage of a raw capture, as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Analysis {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub priority: Priority,
    pub subtasks: Vec<String>,
    pub remark: String,
    #[serde(default)]
    pub links: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistantError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Reminder,
    Completion,
}

impl NoticeKind {
    /// Used without a network call when no credential is configured.
    pub fn offline_message(&self, task_title: &str) -> String {
        match self {
            Self::Reminder => format!("Time to focus on: {}", task_title),
            Self::Completion => "Great job!".to_string(),
        }
    }

    /// Used when the request fails.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Reminder => "Don't forget this!",
            Self::Completion => "Task Completed!",
        }
    }

    /// Used when the model answers with nothing.
    pub fn empty_message(&self) -> &'static str {
        match self {
            Self::Reminder => "Reminder!",
            Self::Completion => "Done!",
        }
    }

    pub fn prompt(&self, task_title: &str) -> String {
        match self {
            Self::Reminder => format!(
                "Write a humorous, slightly nagging but friendly 1-sentence reminder for the task: \"{}\".",
                task_title
            ),
            Self::Completion => format!(
                "Write a high-energy, 1-sentence praise for completing: \"{}\".",
                task_title
            ),
        }
    }
}

/// The hosted model behind capture triage and task enrichment.
///
/// `analyze` and `assist` fail with [`AssistantError`]; callers have a defined
/// fallback for both. `notification_message` always resolves to a string.
#[async_trait]
pub trait Assistant: Send + Sync {
    fn has_credential(&self) -> bool;

    async fn analyze(&self, text: &str) -> Result<Analysis, AssistantError>;

    async fn assist(&self, task_title: &str) -> Result<AiAssistance, AssistantError>;

    async fn notification_message(&self, kind: NoticeKind, task_title: &str) -> String;
}
