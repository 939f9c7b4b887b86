use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::assistant::AssistantError;
use crate::capture::{Captured, SourceHint};
use crate::core::task::{AiAssistance, Task};
use crate::platform::ClipboardRead;

#[derive(Debug, Clone)]
pub enum Message {
    // Capture bar
    InputChanged(String),
    Submit,
    CaptureText { text: String, hint: SourceHint },
    CaptureDone(Option<Captured>),
    PasteFromClipboard,
    ClipboardRead(ClipboardRead),
    StartDictation,
    DictationDone(Option<String>),

    // Task edits
    ToggleTaskDone(Uuid),
    CompletionMessage(String),
    DeleteTask(Uuid),
    UpdateTask(Task),
    UpdateTaskTitle(Uuid, String),
    CyclePriority(Uuid),
    SetReminder(Uuid, NaiveDateTime),
    ToggleSubtask(Uuid, Uuid),

    // AI deep dive
    RequestAssist(Uuid),
    AssistDone(Uuid, Result<AiAssistance, AssistantError>),

    // Clear all
    ClearAll,
    ClearConfirmExpired(u64),

    // Reminders
    CheckReminders(NaiveDateTime),
    ReminderMessage(Uuid, String),

    DismissToast,
}
