use std::sync::Arc;

use uuid::Uuid;

use super::render;
use super::shell;
use super::when::parse_when;
use super::{Commands, KeyCmd};
use crate::app::{App, Message, Runtime, Services};
use crate::assistant::anthropic::AnthropicAssistant;
use crate::assistant::keyring::{self, KeyringError};
use crate::assistant::AssistantError;
use crate::capture::SourceHint;
use crate::config::QuickCapConfig;
use crate::core::store::{ResolveError, TaskStore};
use crate::core::task::Task;
use crate::persist::JsonFileBackend;
use crate::platform::desktop::{CommandDictation, DesktopNotifier, SystemClipboard};
use crate::platform::{Clipboard, ClipboardRead};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("could not understand time '{0}'")]
    BadTime(String),
    #[error("task has no subtask {0}")]
    NoSubtask(usize),
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error(transparent)]
    Keyring(#[from] KeyringError),
    #[error(transparent)]
    Assistant(#[from] AssistantError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct Context {
    pub config: QuickCapConfig,
    pub json: bool,
}

pub async fn build_services(config: &QuickCapConfig) -> Services {
    let api_key = keyring::resolve_api_key().await;
    if api_key.is_none() {
        log::info!("No API key configured; captures go to the inbox unsorted");
    }
    Services {
        assistant: Arc::new(AnthropicAssistant::new(api_key, &config.model, &config.api_url)),
        notifier: Arc::new(DesktopNotifier::new()),
        clipboard: Arc::new(SystemClipboard),
        dictation: Arc::new(CommandDictation::new(config.dictation_command.clone())),
    }
}

pub fn build_app(config: &QuickCapConfig, services: Services) -> App {
    let store = TaskStore::open(JsonFileBackend::new(config.tasks_path()));
    let app = App::new(store, services).with_clear_window(config.clear_window());
    app.activate();
    app
}

pub async fn dispatch(command: Commands, ctx: &Context) -> Result<(), CliError> {
    let services = build_services(&ctx.config).await;
    let clipboard = services.clipboard.clone();
    let mut runtime = Runtime::new(build_app(&ctx.config, services));

    match command {
        Commands::Shell => shell::run(&mut runtime, &ctx.config).await?,
        Commands::Add(args) => {
            let text = args.text.join(" ");
            runtime.dispatch(Message::InputChanged(text));
            if args.dictate {
                runtime.dispatch(Message::StartDictation);
                runtime.run_until_idle().await;
            }
            start_capture(&mut runtime, Message::Submit);
            runtime.run_until_idle().await;
            report_capture(&runtime, ctx)?;
        }
        Commands::Paste => match clipboard.read_text().await {
            ClipboardRead::Text(text) => {
                start_capture(
                    &mut runtime,
                    Message::CaptureText {
                        text,
                        hint: SourceHint::PasteOverride,
                    },
                );
                runtime.run_until_idle().await;
                report_capture(&runtime, ctx)?;
            }
            ClipboardRead::Empty => println!("Clipboard empty"),
            ClipboardRead::Denied => println!("Clipboard access required"),
        },
        Commands::List => {
            let app = runtime.app();
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&app.sorted())?);
            } else {
                print!("{}", render::queue(&app.sorted()));
            }
        }
        Commands::Show(arg) => {
            let id = resolve(&runtime, &arg.id)?;
            print_task(&runtime, id, ctx)?;
        }
        Commands::Done(arg) => {
            let id = resolve(&runtime, &arg.id)?;
            runtime.dispatch(Message::ToggleTaskDone(id));
            runtime.run_until_idle().await;
            print_toast(&runtime);
            print_line(&runtime, id);
        }
        Commands::Rm(arg) => {
            let id = resolve(&runtime, &arg.id)?;
            let title = runtime.app().store().get(id).map(|t| t.title.clone());
            runtime.dispatch(Message::DeleteTask(id));
            if let Some(title) = title {
                println!("Deleted: {}", title);
            }
        }
        Commands::Edit(args) => {
            let id = resolve(&runtime, &args.id)?;
            let title = args.title.join(" ");
            if title.trim().is_empty() {
                return Err(CliError::EmptyTitle);
            }
            runtime.dispatch(Message::UpdateTaskTitle(id, title));
            print_line(&runtime, id);
        }
        Commands::Priority(arg) => {
            let id = resolve(&runtime, &arg.id)?;
            runtime.dispatch(Message::CyclePriority(id));
            print_line(&runtime, id);
        }
        Commands::Remind(args) => {
            let id = resolve(&runtime, &args.id)?;
            let when = args.when.join(" ");
            let now = chrono::Local::now().naive_local();
            let at = parse_when(&when, now).ok_or(CliError::BadTime(when))?;
            runtime.dispatch(Message::SetReminder(id, at));
            print_line(&runtime, id);
        }
        Commands::Subtask(args) => {
            let id = resolve(&runtime, &args.id)?;
            let subtask_id = subtask_at(runtime.app().store().get(id), args.number)
                .ok_or(CliError::NoSubtask(args.number))?;
            runtime.dispatch(Message::ToggleSubtask(id, subtask_id));
            print_task(&runtime, id, ctx)?;
        }
        Commands::Assist(arg) => {
            let id = resolve(&runtime, &arg.id)?;
            runtime.dispatch(Message::RequestAssist(id));
            runtime.run_until_idle().await;
            print_toast(&runtime);
            print_task(&runtime, id, ctx)?;
        }
        Commands::Status => {
            let app = runtime.app();
            println!("{}", if app.is_connected() { "Connected" } else { "Offline" });
            println!("Tasks:     {}", ctx.config.tasks_path().display());
            println!("Queue:     {} open / {} total", app.store().queue_len(), app.store().len());
            println!(
                "Dictation: {}",
                if app.dictation_available() { "available" } else { "not configured" }
            );
        }
        Commands::Key(KeyCmd::Set { key }) => {
            keyring::store_api_key(key.trim()).await?;
            println!("API key stored");
        }
        Commands::Key(KeyCmd::Test) => {
            let assistant = AnthropicAssistant::new(
                keyring::resolve_api_key().await,
                &ctx.config.model,
                &ctx.config.api_url,
            );
            println!("{}", assistant.verify().await?);
        }
    }

    Ok(())
}

pub(crate) fn resolve(runtime: &Runtime, prefix: &str) -> Result<Uuid, ResolveError> {
    runtime.app().store().resolve(prefix)
}

/// 1-based subtask number to subtask id.
pub(crate) fn subtask_at(task: Option<&Task>, number: usize) -> Option<Uuid> {
    let index = number.checked_sub(1)?;
    task?.subtasks.get(index).map(|s| s.id)
}

fn start_capture(runtime: &mut Runtime, message: Message) {
    runtime.dispatch(message);
    if runtime.pending() == 0 {
        eprintln!("Nothing to capture");
    }
}

fn report_capture(runtime: &Runtime, ctx: &Context) -> Result<(), CliError> {
    // A fresh process captures at most one task, and it lands at the front.
    let Some(toast) = runtime.app().toast() else {
        return Ok(());
    };
    let Some(task) = runtime.app().store().tasks().first() else {
        return Ok(());
    };
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", render::toast(toast));
        println!("{}", render::task_line(task));
    }
    Ok(())
}

fn print_toast(runtime: &Runtime) {
    if let Some(toast) = runtime.app().toast() {
        println!("{}", render::toast(toast));
    }
}

fn print_line(runtime: &Runtime, id: Uuid) {
    if let Some(task) = runtime.app().store().get(id) {
        println!("{}", render::task_line(task));
    }
}

fn print_task(runtime: &Runtime, id: Uuid, ctx: &Context) -> Result<(), CliError> {
    if let Some(task) = runtime.app().store().get(id) {
        if ctx.json {
            println!("{}", serde_json::to_string_pretty(task)?);
        } else {
            print!("{}", render::detail(task));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::Priority;

    #[test]
    fn subtask_numbers_are_one_based() {
        let task = Task::new("Plan trip", "Personal", Priority::High).with_subtasks(["Book", "Pack"]);
        assert_eq!(subtask_at(Some(&task), 1), Some(task.subtasks[0].id));
        assert_eq!(subtask_at(Some(&task), 2), Some(task.subtasks[1].id));
        assert_eq!(subtask_at(Some(&task), 0), None);
        assert_eq!(subtask_at(Some(&task), 3), None);
        assert_eq!(subtask_at(None, 1), None);
    }
}
