use crate::assistant::{Analysis, Assistant, AssistantError};
use crate::core::task::{Priority, Source, Task};

pub const FALLBACK_CATEGORY: &str = "Inbox";

/// How the text reached the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceHint {
    /// Typed or dictated into the input bar.
    Input,
    /// Submitted straight from the clipboard, bypassing the input bar.
    PasteOverride,
}

impl SourceHint {
    /// Dictation is merged into the input bar before submission, so it is
    /// recorded as manual like typed text.
    pub fn source(&self) -> Source {
        match self {
            Self::Input => Source::Manual,
            Self::PasteOverride => Source::Clipboard,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Analyzed,
    Fallback(AssistantError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    pub task: Task,
    pub outcome: Outcome,
}

impl Captured {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, Outcome::Fallback(_))
    }
}

/// Turn raw text into a task. Blank input yields `None`; an unavailable
/// assistant yields a fallback task rather than an error.
pub async fn capture(assistant: &dyn Assistant, text: &str, hint: SourceHint) -> Option<Captured> {
    if text.trim().is_empty() {
        return None;
    }

    let captured = match assistant.analyze(text).await {
        Ok(analysis) => Captured {
            task: task_from_analysis(analysis, hint.source()),
            outcome: Outcome::Analyzed,
        },
        Err(e) => {
            log::warn!("Assistant unavailable, capturing to {}: {}", FALLBACK_CATEGORY, e);
            Captured {
                task: fallback_task(text),
                outcome: Outcome::Fallback(e),
            }
        }
    };
    Some(captured)
}

pub fn task_from_analysis(analysis: Analysis, source: Source) -> Task {
    let mut task = Task::new(analysis.title, analysis.category, analysis.priority)
        .with_subtasks(analysis.subtasks)
        .with_source(source);
    task.description = analysis.description;
    task.ai_remark = Some(analysis.remark);
    task.links = analysis.links;
    task
}

/// Raw text verbatim, filed to the inbox at medium priority.
pub fn fallback_task(text: &str) -> Task {
    Task::new(text, FALLBACK_CATEGORY, Priority::Medium).with_source(Source::Manual)
}
