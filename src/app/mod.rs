//! Application state and the update function that turns messages into store
//! mutations and effects.
//!
//! Views only read from [`App`] and dispatch [`Message`]s; all async work
//! comes back as another message, and anything aimed at a task that has since
//! been deleted is dropped on arrival.

pub mod command;
pub mod message;
pub mod runtime;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::assistant::{Assistant, NoticeKind};
use crate::capture::{self, SourceHint};
use crate::core::confirm::{ClearConfirm, ConfirmAction};
use crate::core::input::StagedInput;
use crate::core::slot::SingleSlot;
use crate::core::store::TaskStore;
use crate::core::task::Task;
use crate::platform::{Clipboard, ClipboardRead, Dictation, Notifier, Permission};

pub use command::Command;
pub use message::Message;
pub use runtime::Runtime;

pub const DEFAULT_CLEAR_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
        }
    }
}

/// External collaborators the app talks to.
#[derive(Clone)]
pub struct Services {
    pub assistant: Arc<dyn Assistant>,
    pub notifier: Arc<dyn Notifier>,
    pub clipboard: Arc<dyn Clipboard>,
    pub dictation: Arc<dyn Dictation>,
}

pub struct App {
    store: TaskStore,
    input: StagedInput,
    captures_in_flight: usize,
    listening: bool,
    assisting: SingleSlot,
    clear_confirm: ClearConfirm,
    clear_window: Duration,
    toast: Option<Toast>,
    announced_reminders: HashSet<(Uuid, NaiveDateTime)>,
    services: Services,
}

impl App {
    pub fn new(store: TaskStore, services: Services) -> Self {
        Self {
            store,
            input: StagedInput::new(),
            captures_in_flight: 0,
            listening: false,
            assisting: SingleSlot::new(),
            clear_confirm: ClearConfirm::new(),
            clear_window: DEFAULT_CLEAR_WINDOW,
            toast: None,
            announced_reminders: HashSet::new(),
            services,
        }
    }

    pub fn with_clear_window(mut self, window: Duration) -> Self {
        self.clear_window = window;
        self
    }

    /// Entering the active view: ask for notification permission once.
    pub fn activate(&self) -> Permission {
        self.services.notifier.request_permission()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn sorted(&self) -> Vec<&Task> {
        self.store.sorted()
    }

    pub fn input_text(&self) -> &str {
        self.input.text()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// At least one capture is waiting on the assistant.
    pub fn is_analyzing(&self) -> bool {
        self.captures_in_flight > 0
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn assisting(&self) -> Option<Uuid> {
        self.assisting.holder()
    }

    pub fn clear_armed(&self) -> bool {
        self.clear_confirm.is_armed()
    }

    pub fn is_connected(&self) -> bool {
        self.services.assistant.has_credential()
    }

    pub fn dictation_available(&self) -> bool {
        self.services.dictation.is_available()
    }

    pub fn update(&mut self, message: Message) -> Command {
        match message {
            Message::InputChanged(text) => {
                self.input.set(text);
            }

            Message::Submit => {
                if self.input.is_blank() {
                    return Command::none();
                }
                let text = self.input.take();
                return self.start_capture(text, SourceHint::Input);
            }

            Message::CaptureText { text, hint } => {
                return self.start_capture(text, hint);
            }

            Message::CaptureDone(captured) => {
                self.captures_in_flight = self.captures_in_flight.saturating_sub(1);
                let Some(captured) = captured else {
                    return Command::none();
                };
                let fallback = captured.is_fallback();
                let task = captured.task;
                let body = format!("Task prioritized: {} ({})", task.title, task.priority);
                log::info!(
                    "Captured '{}' [{} / {}]{}",
                    task.title,
                    task.category,
                    task.priority,
                    if fallback { " via fallback" } else { "" }
                );
                self.store.add(task);
                if !fallback {
                    self.services.notifier.notify("Quick Capture", &body);
                }
                self.toast = Some(Toast::success("Captured"));
            }

            Message::PasteFromClipboard => {
                let clipboard = self.services.clipboard.clone();
                return Command::perform(
                    async move { clipboard.read_text().await },
                    Message::ClipboardRead,
                );
            }

            Message::ClipboardRead(read) => {
                self.toast = Some(match read {
                    ClipboardRead::Text(text) => {
                        self.input.set(text);
                        Toast::info("Pasted from clipboard")
                    }
                    ClipboardRead::Empty => Toast::info("Clipboard empty"),
                    ClipboardRead::Denied => Toast::info("Clipboard access required"),
                });
            }

            Message::StartDictation => {
                if self.listening || !self.services.dictation.is_available() {
                    return Command::none();
                }
                self.listening = true;
                let dictation = self.services.dictation.clone();
                return Command::perform(
                    async move { dictation.listen().await },
                    Message::DictationDone,
                );
            }

            Message::DictationDone(transcript) => {
                self.listening = false;
                if let Some(transcript) = transcript {
                    self.input.append_transcript(&transcript);
                }
            }

            Message::ToggleTaskDone(id) => {
                if let Some(completion) = self.store.toggle_complete(id) {
                    let assistant = self.services.assistant.clone();
                    return Command::perform(
                        async move {
                            assistant
                                .notification_message(NoticeKind::Completion, &completion.title)
                                .await
                        },
                        Message::CompletionMessage,
                    );
                }
            }

            Message::CompletionMessage(text) => {
                self.services.notifier.notify("Task Complete!", &text);
                self.toast = Some(Toast::success(text));
            }

            Message::DeleteTask(id) => {
                self.store.remove(id);
            }

            Message::UpdateTask(task) => {
                self.store.update(task);
            }

            Message::UpdateTaskTitle(id, title) => {
                self.store.edit_title(id, &title);
            }

            Message::CyclePriority(id) => {
                self.store.cycle_priority(id);
            }

            Message::SetReminder(id, at) => {
                self.store.set_reminder(id, at);
            }

            Message::ToggleSubtask(task_id, subtask_id) => {
                self.store.toggle_subtask(task_id, subtask_id);
            }

            Message::RequestAssist(id) => {
                let Some(title) = self.store.get(id).map(|t| t.title.clone()) else {
                    return Command::none();
                };
                if !self.assisting.try_acquire(id) {
                    log::debug!("Assist already in flight; ignoring request for {}", id);
                    return Command::none();
                }
                let assistant = self.services.assistant.clone();
                return Command::perform(
                    async move { assistant.assist(&title).await },
                    move |result| Message::AssistDone(id, result),
                );
            }

            Message::AssistDone(id, result) => {
                self.assisting.release(id);
                if !self.store.contains(id) {
                    log::debug!("Discarding assist result for deleted task {}", id);
                    return Command::none();
                }
                match result {
                    Ok(plan) => {
                        self.store.attach_assistance(id, plan);
                        self.toast = Some(Toast::success("AI Plan Generated!"));
                    }
                    Err(e) => {
                        log::warn!("Assist request failed: {}", e);
                        self.toast = Some(Toast::info("Failed to generate plan."));
                    }
                }
            }

            Message::ClearAll => match self.clear_confirm.request() {
                ConfirmAction::Armed(generation) => {
                    let window = self.clear_window;
                    return Command::perform(tokio::time::sleep(window), move |_| {
                        Message::ClearConfirmExpired(generation)
                    });
                }
                ConfirmAction::Execute => {
                    self.store.clear();
                    self.toast = Some(Toast::info("All tasks cleared"));
                }
            },

            Message::ClearConfirmExpired(generation) => {
                self.clear_confirm.expire(generation);
            }

            Message::CheckReminders(now) => {
                // Forget announcements for deleted tasks and replaced times.
                let store = &self.store;
                self.announced_reminders.retain(|(id, at)| {
                    store.get(*id).is_some_and(|t| t.reminder_time == Some(*at))
                });

                let due: Vec<(Uuid, NaiveDateTime, String)> = self
                    .store
                    .tasks()
                    .iter()
                    .filter(|t| t.reminder_due(now))
                    .filter_map(|t| t.reminder_time.map(|at| (t.id, at, t.title.clone())))
                    .filter(|(id, at, _)| !self.announced_reminders.contains(&(*id, *at)))
                    .collect();

                let mut commands = Vec::with_capacity(due.len());
                for (id, at, title) in due {
                    self.announced_reminders.insert((id, at));
                    let assistant = self.services.assistant.clone();
                    commands.push(Command::perform(
                        async move {
                            assistant
                                .notification_message(NoticeKind::Reminder, &title)
                                .await
                        },
                        move |text| Message::ReminderMessage(id, text),
                    ));
                }
                return Command::batch(commands);
            }

            Message::ReminderMessage(id, text) => {
                if self.store.contains(id) {
                    self.services.notifier.notify("Reminder", &text);
                    self.toast = Some(Toast::info(text));
                }
            }

            Message::DismissToast => {
                self.toast = None;
            }
        }

        Command::none()
    }

    fn start_capture(&mut self, text: String, hint: SourceHint) -> Command {
        if text.trim().is_empty() {
            return Command::none();
        }
        // Input stays enabled; several captures may be in flight at once.
        self.captures_in_flight += 1;
        let assistant = self.services.assistant.clone();
        Command::perform(
            async move { capture::capture(assistant.as_ref(), &text, hint).await },
            Message::CaptureDone,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::AssistantError;
    use crate::assistant::mock::{MockAssistant, analysis, plan};
    use crate::core::task::{Priority, Source};
    use crate::persist::MemoryBackend;
    use crate::platform::fake::{RecordingNotifier, ScriptedDictation, StaticClipboard};

    struct Harness {
        runtime: Runtime,
        assistant: Arc<MockAssistant>,
        notifier: Arc<RecordingNotifier>,
        backend: MemoryBackend,
    }

    fn harness_with(assistant: MockAssistant, tasks: Vec<Task>) -> Harness {
        harness_full(
            assistant,
            tasks,
            ClipboardRead::Empty,
            None,
            RecordingNotifier::granted(),
        )
    }

    fn harness_full(
        assistant: MockAssistant,
        tasks: Vec<Task>,
        clipboard: ClipboardRead,
        transcript: Option<String>,
        notifier: RecordingNotifier,
    ) -> Harness {
        let assistant = Arc::new(assistant);
        let notifier = Arc::new(notifier);
        let backend = MemoryBackend::with_tasks(tasks);
        let services = Services {
            assistant: assistant.clone(),
            notifier: notifier.clone(),
            clipboard: Arc::new(StaticClipboard(clipboard)),
            dictation: Arc::new(ScriptedDictation(transcript)),
        };
        let app = App::new(TaskStore::open(backend.clone()), services);
        app.activate();
        Harness {
            runtime: Runtime::new(app),
            assistant,
            notifier,
            backend,
        }
    }

    fn app(h: &Harness) -> &App {
        h.runtime.app()
    }

    #[tokio::test]
    async fn capture_success_lands_at_front() {
        let mut h = harness_with(
            MockAssistant::new().push_analysis(Ok(analysis("Buy milk", "Shopping", Priority::Low))),
            vec![Task::new("Older", "Work", Priority::High)],
        );
        h.runtime.dispatch(Message::InputChanged("Buy milk".into()));
        h.runtime.dispatch(Message::Submit);
        assert_eq!(app(&h).input_text(), "");
        assert!(app(&h).is_analyzing());

        h.runtime.run_until_idle().await;

        let store = app(&h).store();
        assert_eq!(store.len(), 2);
        let task = &store.tasks()[0];
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.category, "Shopping");
        assert_eq!(task.priority, Priority::Low);
        assert!(task.subtasks.is_empty());
        assert_eq!(task.ai_remark.as_deref(), Some("Nice."));
        assert_eq!(task.source, Source::Manual);
        assert!(!app(&h).is_analyzing());
        assert_eq!(app(&h).toast().unwrap().message, "Captured");
        assert_eq!(
            h.notifier.shown(),
            [(
                "Quick Capture".to_string(),
                "Task prioritized: Buy milk (Low)".to_string()
            )]
        );
        assert_eq!(h.backend.stored().unwrap(), store.tasks());
    }

    #[tokio::test]
    async fn blank_submit_does_nothing() {
        let mut h = harness_with(MockAssistant::new(), Vec::new());
        h.runtime.dispatch(Message::Submit);
        h.runtime.dispatch(Message::CaptureText {
            text: "   ".into(),
            hint: SourceHint::PasteOverride,
        });
        assert_eq!(h.runtime.pending(), 0);
        h.runtime.run_until_idle().await;
        assert!(app(&h).store().is_empty());
        assert_eq!(h.backend.save_count(), 0);
        assert_eq!(h.assistant.analyze_calls(), 0);
    }

    #[tokio::test]
    async fn failed_capture_falls_back_without_system_notification() {
        let mut h = harness_with(
            MockAssistant::new().push_analysis(Err(AssistantError::Transport("timeout".into()))),
            Vec::new(),
        );
        h.runtime.dispatch(Message::InputChanged("Call mom".into()));
        h.runtime.dispatch(Message::Submit);
        h.runtime.run_until_idle().await;

        let task = &app(&h).store().tasks()[0];
        assert_eq!(task.title, "Call mom");
        assert_eq!(task.category, "Inbox");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.subtasks.is_empty());
        assert!(h.notifier.shown().is_empty());
        assert!(app(&h).toast().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn captures_run_concurrently() {
        let mut h = harness_with(
            MockAssistant::new()
                .with_delay(Duration::from_secs(2))
                .push_analysis(Ok(analysis("One", "Work", Priority::Low)))
                .push_analysis(Ok(analysis("Two", "Work", Priority::High))),
            Vec::new(),
        );
        h.runtime.dispatch(Message::InputChanged("one".into()));
        h.runtime.dispatch(Message::Submit);
        h.runtime.dispatch(Message::InputChanged("two".into()));
        h.runtime.dispatch(Message::Submit);
        assert_eq!(h.runtime.pending(), 2);

        let start = tokio::time::Instant::now();
        h.runtime.run_until_idle().await;
        assert!(start.elapsed() < Duration::from_secs(4));
        assert_eq!(app(&h).store().len(), 2);
        assert_eq!(h.assistant.analyze_calls(), 2);
    }

    #[tokio::test]
    async fn paste_override_capture_is_clipboard_sourced() {
        let mut h = harness_with(
            MockAssistant::new().push_analysis(Ok(analysis("Desk chair", "Shopping", Priority::Low))),
            Vec::new(),
        );
        h.runtime.dispatch(Message::CaptureText {
            text: "https://shop.example/chair".into(),
            hint: SourceHint::PasteOverride,
        });
        h.runtime.run_until_idle().await;
        assert_eq!(app(&h).store().tasks()[0].source, Source::Clipboard);
    }

    #[tokio::test]
    async fn clipboard_paste_stages_text() {
        let mut h = harness_full(
            MockAssistant::new(),
            Vec::new(),
            ClipboardRead::Text("https://example.com".into()),
            None,
            RecordingNotifier::granted(),
        );
        h.runtime.dispatch(Message::PasteFromClipboard);
        h.runtime.run_until_idle().await;
        assert_eq!(app(&h).input_text(), "https://example.com");
        assert_eq!(app(&h).toast().unwrap().message, "Pasted from clipboard");
        assert!(app(&h).store().is_empty());
    }

    #[tokio::test]
    async fn clipboard_empty_and_denied_only_toast() {
        for (read, expected) in [
            (ClipboardRead::Empty, "Clipboard empty"),
            (ClipboardRead::Denied, "Clipboard access required"),
        ] {
            let mut h = harness_full(
                MockAssistant::new(),
                Vec::new(),
                read,
                None,
                RecordingNotifier::granted(),
            );
            h.runtime.dispatch(Message::InputChanged("draft".into()));
            h.runtime.dispatch(Message::PasteFromClipboard);
            h.runtime.run_until_idle().await;
            assert_eq!(app(&h).input_text(), "draft");
            let toast = app(&h).toast().unwrap();
            assert_eq!(toast.message, expected);
            assert_eq!(toast.kind, ToastKind::Info);
        }
    }

    #[tokio::test]
    async fn dictation_appends_and_stays_manual() {
        let mut h = harness_full(
            MockAssistant::new().push_analysis(Ok(analysis("Buy eggs", "Shopping", Priority::Low))),
            Vec::new(),
            ClipboardRead::Empty,
            Some("and bread".into()),
            RecordingNotifier::granted(),
        );
        h.runtime.dispatch(Message::InputChanged("buy eggs".into()));
        h.runtime.dispatch(Message::StartDictation);
        assert!(app(&h).is_listening());
        h.runtime.run_until_idle().await;
        assert!(!app(&h).is_listening());
        assert_eq!(app(&h).input_text(), "buy eggs and bread");

        h.runtime.dispatch(Message::Submit);
        h.runtime.run_until_idle().await;
        assert_eq!(app(&h).store().tasks()[0].source, Source::Manual);
    }

    #[tokio::test]
    async fn dictation_unavailable_is_inert() {
        let mut h = harness_with(MockAssistant::new(), Vec::new());
        h.runtime.dispatch(Message::StartDictation);
        assert!(!app(&h).is_listening());
        assert_eq!(h.runtime.pending(), 0);
    }

    #[tokio::test]
    async fn completing_notifies_but_reopening_does_not() {
        let task = Task::new("Write report", "Work", Priority::High);
        let id = task.id;
        let mut h = harness_with(MockAssistant::new(), vec![task]);

        h.runtime.dispatch(Message::ToggleTaskDone(id));
        h.runtime.run_until_idle().await;
        assert!(app(&h).store().get(id).unwrap().is_completed);
        assert_eq!(
            h.notifier.shown(),
            [(
                "Task Complete!".to_string(),
                "Crushed it: Write report".to_string()
            )]
        );

        h.runtime.dispatch(Message::ToggleTaskDone(id));
        assert_eq!(h.runtime.pending(), 0);
        h.runtime.run_until_idle().await;
        assert!(!app(&h).store().get(id).unwrap().is_completed);
        assert_eq!(h.notifier.shown().len(), 1);
    }

    #[tokio::test]
    async fn notifications_respect_permission() {
        let task = Task::new("Write report", "Work", Priority::High);
        let id = task.id;
        let mut h = harness_full(
            MockAssistant::new().push_analysis(Ok(analysis("Buy milk", "Shopping", Priority::Low))),
            vec![task],
            ClipboardRead::Empty,
            None,
            RecordingNotifier::denied(),
        );
        h.runtime.dispatch(Message::ToggleTaskDone(id));
        h.runtime.dispatch(Message::CaptureText {
            text: "milk".into(),
            hint: SourceHint::Input,
        });
        h.runtime.run_until_idle().await;
        assert!(h.notifier.shown().is_empty());
        assert_eq!(app(&h).store().len(), 2);
    }

    #[tokio::test]
    async fn edits_flow_through_store() {
        let task = Task::new("Plan trip", "Personal", Priority::Low).with_subtasks(["Book"]);
        let (id, sub) = (task.id, task.subtasks[0].id);
        let mut h = harness_with(MockAssistant::new(), vec![task]);
        let at = chrono::NaiveDate::from_ymd_opt(2026, 7, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        h.runtime.dispatch(Message::UpdateTaskTitle(id, "Plan Tokyo trip".into()));
        h.runtime.dispatch(Message::CyclePriority(id));
        h.runtime.dispatch(Message::SetReminder(id, at));
        h.runtime.dispatch(Message::ToggleSubtask(id, sub));

        let task = app(&h).store().get(id).unwrap().clone();
        assert_eq!(task.title, "Plan Tokyo trip");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.reminder_time, Some(at));
        assert!(task.subtasks[0].is_completed);

        let mut replaced = task.clone();
        replaced.title = "Trip".into();
        h.runtime.dispatch(Message::UpdateTask(replaced.clone()));
        assert_eq!(app(&h).store().get(id), Some(&replaced));

        h.runtime.dispatch(Message::DeleteTask(id));
        assert!(app(&h).store().is_empty());
        assert_eq!(h.backend.stored(), Some(Vec::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_all_requires_confirmation_within_window() {
        let mut h = harness_with(
            MockAssistant::new(),
            vec![Task::new("a", "Inbox", Priority::Low)],
        );

        h.runtime.dispatch(Message::ClearAll);
        assert!(app(&h).clear_armed());
        assert_eq!(app(&h).store().len(), 1);

        h.runtime.dispatch(Message::ClearAll);
        assert!(!app(&h).clear_armed());
        assert!(app(&h).store().is_empty());
        assert_eq!(app(&h).toast().unwrap().message, "All tasks cleared");

        // The first arming's timer fires later and must not re-arm anything.
        h.runtime.run_until_idle().await;
        assert!(!app(&h).clear_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_all_disarms_after_timeout() {
        let mut h = harness_with(
            MockAssistant::new(),
            vec![Task::new("a", "Inbox", Priority::Low)],
        );

        h.runtime.dispatch(Message::ClearAll);
        let start = tokio::time::Instant::now();
        h.runtime.run_until_idle().await;
        assert!(start.elapsed() >= DEFAULT_CLEAR_WINDOW);
        assert!(!app(&h).clear_armed());
        assert_eq!(app(&h).store().len(), 1);

        // A new first request arms again instead of clearing.
        h.runtime.dispatch(Message::ClearAll);
        assert!(app(&h).clear_armed());
        assert_eq!(app(&h).store().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn one_assist_in_flight_across_tasks() {
        let x = Task::new("Task X", "Work", Priority::Low);
        let y = Task::new("Task Y", "Work", Priority::Low);
        let (xid, yid) = (x.id, y.id);
        let mut h = harness_with(
            MockAssistant::new()
                .with_delay(Duration::from_secs(5))
                .push_plan(Ok(plan("for Y")))
                .push_plan(Ok(plan("for X"))),
            vec![x, y],
        );

        h.runtime.dispatch(Message::RequestAssist(yid));
        assert_eq!(app(&h).assisting(), Some(yid));
        h.runtime.dispatch(Message::RequestAssist(xid));
        assert_eq!(h.runtime.pending(), 1);
        assert_eq!(app(&h).assisting(), Some(yid));

        h.runtime.run_until_idle().await;
        assert_eq!(app(&h).assisting(), None);
        assert_eq!(
            app(&h).store().get(yid).unwrap().ai_assistance.as_ref().unwrap().pro_tip,
            "for Y"
        );
        assert!(app(&h).store().get(xid).unwrap().ai_assistance.is_none());

        h.runtime.dispatch(Message::RequestAssist(xid));
        assert_eq!(app(&h).assisting(), Some(xid));
        h.runtime.run_until_idle().await;
        assert_eq!(
            app(&h).store().get(xid).unwrap().ai_assistance.as_ref().unwrap().pro_tip,
            "for X"
        );
        assert_eq!(h.assistant.assist_calls(), 2);
    }

    #[tokio::test]
    async fn assist_failure_releases_slot_and_keeps_task() {
        let task = Task::new("Learn Rust", "Dev", Priority::High);
        let id = task.id;
        let mut h = harness_with(
            MockAssistant::new().push_plan(Err(AssistantError::MalformedResponse("nope".into()))),
            vec![task.clone()],
        );
        h.runtime.dispatch(Message::RequestAssist(id));
        h.runtime.run_until_idle().await;
        assert_eq!(app(&h).assisting(), None);
        assert_eq!(app(&h).store().get(id), Some(&task));
        let toast = app(&h).toast().unwrap();
        assert_eq!(toast.message, "Failed to generate plan.");
        assert_eq!(toast.kind, ToastKind::Info);
    }

    #[tokio::test(start_paused = true)]
    async fn assist_result_for_deleted_task_is_discarded() {
        let task = Task::new("Learn Rust", "Dev", Priority::High);
        let id = task.id;
        let mut h = harness_with(
            MockAssistant::new()
                .with_delay(Duration::from_secs(1))
                .push_plan(Ok(plan("late"))),
            vec![task],
        );
        h.runtime.dispatch(Message::RequestAssist(id));
        h.runtime.dispatch(Message::DeleteTask(id));
        let saves = h.backend.save_count();
        h.runtime.run_until_idle().await;
        assert!(app(&h).store().is_empty());
        assert_eq!(app(&h).assisting(), None);
        assert_eq!(h.backend.save_count(), saves);
    }

    #[tokio::test]
    async fn assist_for_unknown_task_is_noop() {
        let mut h = harness_with(MockAssistant::new(), Vec::new());
        h.runtime.dispatch(Message::RequestAssist(Uuid::new_v4()));
        assert_eq!(h.runtime.pending(), 0);
        assert_eq!(app(&h).assisting(), None);
    }

    #[tokio::test]
    async fn reminders_fire_once_per_time() {
        let mut task = Task::new("Stretch", "Health", Priority::Medium);
        let at = chrono::NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        task.reminder_time = Some(at);
        let id = task.id;
        let mut h = harness_with(MockAssistant::new(), vec![task]);

        h.runtime
            .dispatch(Message::CheckReminders(at - chrono::Duration::minutes(5)));
        h.runtime.run_until_idle().await;
        assert!(h.notifier.shown().is_empty());

        h.runtime.dispatch(Message::CheckReminders(at));
        h.runtime.run_until_idle().await;
        h.runtime
            .dispatch(Message::CheckReminders(at + chrono::Duration::minutes(1)));
        h.runtime.run_until_idle().await;
        assert_eq!(
            h.notifier.shown(),
            [("Reminder".to_string(), "Psst: Stretch".to_string())]
        );

        let later = at + chrono::Duration::hours(1);
        h.runtime.dispatch(Message::SetReminder(id, later));
        h.runtime.dispatch(Message::CheckReminders(later));
        h.runtime.run_until_idle().await;
        assert_eq!(h.notifier.shown().len(), 2);
    }

    #[tokio::test]
    async fn announced_reminders_are_pruned() {
        let at = chrono::NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut kept = Task::new("Stretch", "Health", Priority::Medium);
        kept.reminder_time = Some(at);
        let mut moved = Task::new("Water plants", "Home", Priority::Low);
        moved.reminder_time = Some(at);
        let mut deleted = Task::new("Call bank", "Finance", Priority::High);
        deleted.reminder_time = Some(at);
        let (kept_id, moved_id, deleted_id) = (kept.id, moved.id, deleted.id);
        let mut h = harness_with(MockAssistant::new(), vec![kept, moved, deleted]);

        h.runtime.dispatch(Message::CheckReminders(at));
        h.runtime.run_until_idle().await;
        assert_eq!(app(&h).announced_reminders.len(), 3);

        let later = at + chrono::Duration::days(1);
        h.runtime.dispatch(Message::SetReminder(moved_id, later));
        h.runtime.dispatch(Message::DeleteTask(deleted_id));
        h.runtime.dispatch(Message::CheckReminders(at));
        h.runtime.run_until_idle().await;

        let announced = &app(&h).announced_reminders;
        assert_eq!(announced.len(), 1);
        assert!(announced.contains(&(kept_id, at)));
        assert_eq!(h.notifier.shown().len(), 3);
    }

    #[tokio::test]
    async fn offline_completion_uses_template() {
        let task = Task::new("Taxes", "Personal", Priority::High);
        let id = task.id;
        let mut h = harness_with(MockAssistant::offline(), vec![task]);
        assert!(!app(&h).is_connected());
        h.runtime.dispatch(Message::ToggleTaskDone(id));
        h.runtime.run_until_idle().await;
        assert_eq!(app(&h).toast().unwrap().message, "Great job!");
    }
}
