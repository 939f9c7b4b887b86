//! Interactive capture bar.
//!
//! Plain lines are captured as tasks; lines starting with `/` are commands.
//! Effects (assistant calls, clipboard, dictation, timers) keep running while
//! the shell waits for the next line.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::handlers::{resolve, subtask_at};
use super::render;
use super::when::parse_when;
use crate::app::{Message, Runtime};
use crate::config::QuickCapConfig;

const HELP: &str = "\
Type a task and press Enter to capture it.
Enter on an empty line submits staged text (from /paste or /dictate).

  /list                 show the queue
  /show <id>            show a task in full
  /done <id>            toggle done
  /rm <id>              delete
  /edit <id> <title>    rename
  /prio <id>            cycle priority
  /remind <id> <when>   set a reminder (14:30, +45m, 2026-03-01 09:00)
  /sub <id> <n>         toggle subtask n
  /assist <id>          ask for a step-by-step plan
  /paste                stage clipboard text
  /dictate              stage a dictated utterance
  /clear                clear all tasks (twice to confirm)
  /status               connection and activity
  /quit                 exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Capture(String),
    SubmitStaged,
    List,
    Show(String),
    Done(String),
    Remove(String),
    Edit(String, String),
    Priority(String),
    Remind(String, String),
    Subtask(String, usize),
    Assist(String),
    Paste,
    Dictate,
    Clear,
    Status,
    Help,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::SubmitStaged;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ShellCommand::Capture(line.to_string());
    };

    let (verb, args) = match rest.split_once(char::is_whitespace) {
        Some((verb, args)) => (verb, args.trim()),
        None => (rest, ""),
    };
    let (first, remainder) = match args.split_once(char::is_whitespace) {
        Some((first, remainder)) => (first.to_string(), remainder.trim().to_string()),
        None => (args.to_string(), String::new()),
    };

    match verb {
        "list" | "ls" => ShellCommand::List,
        "show" => with_id(&first, "/show <id>", ShellCommand::Show),
        "done" | "x" => with_id(&first, "/done <id>", ShellCommand::Done),
        "rm" | "del" => with_id(&first, "/rm <id>", ShellCommand::Remove),
        "prio" | "priority" => with_id(&first, "/prio <id>", ShellCommand::Priority),
        "assist" | "plan" => with_id(&first, "/assist <id>", ShellCommand::Assist),
        "edit" if !first.is_empty() && !remainder.is_empty() => {
            ShellCommand::Edit(first, remainder)
        }
        "edit" => ShellCommand::Usage("/edit <id> <title>"),
        "remind" if !first.is_empty() && !remainder.is_empty() => {
            ShellCommand::Remind(first, remainder)
        }
        "remind" => ShellCommand::Usage("/remind <id> <when>"),
        "sub" | "subtask" => match remainder.parse() {
            Ok(n) if !first.is_empty() => ShellCommand::Subtask(first, n),
            _ => ShellCommand::Usage("/sub <id> <n>"),
        },
        "paste" => ShellCommand::Paste,
        "dictate" | "mic" => ShellCommand::Dictate,
        "clear" => ShellCommand::Clear,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => ShellCommand::Unknown(other.to_string()),
    }
}

fn with_id(id: &str, usage: &'static str, f: fn(String) -> ShellCommand) -> ShellCommand {
    if id.is_empty() {
        ShellCommand::Usage(usage)
    } else {
        f(id.to_string())
    }
}

enum Event {
    Line(Option<String>),
    Effect,
    Tick,
}

pub async fn run(runtime: &mut Runtime, config: &QuickCapConfig) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(config.reminder_poll());

    println!("QuickCap [{}]  /help for commands", render::status_bar(runtime.app()));
    print!("{}", render::queue(&runtime.app().sorted()));
    prompt(runtime)?;

    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            _ = runtime.step(), if runtime.pending() > 0 => Event::Effect,
            _ = ticker.tick() => Event::Tick,
        };

        match event {
            Event::Line(None) => break,
            Event::Line(Some(line)) => {
                let command = parse_line(&line);
                if command == ShellCommand::Quit {
                    break;
                }
                handle(runtime, command, config);
            }
            Event::Effect => {}
            Event::Tick => {
                runtime.dispatch(Message::CheckReminders(chrono::Local::now().naive_local()));
                continue;
            }
        }

        if let Some(toast) = runtime.app().toast() {
            println!("{}", render::toast(toast));
            runtime.dispatch(Message::DismissToast);
        }
        prompt(runtime)?;
    }

    if runtime.pending() > 0 {
        log::info!("Exiting with {} requests still in flight", runtime.pending());
    }
    Ok(())
}

fn prompt(runtime: &Runtime) -> std::io::Result<()> {
    let staged = runtime.app().input_text();
    let mut stdout = std::io::stdout();
    if staged.is_empty() {
        write!(stdout, "> ")?;
    } else {
        write!(stdout, "[{}] > ", staged)?;
    }
    stdout.flush()
}

fn handle(runtime: &mut Runtime, command: ShellCommand, config: &QuickCapConfig) {
    let result = match command {
        ShellCommand::Capture(text) => {
            runtime.dispatch(Message::InputChanged(text));
            runtime.dispatch(Message::Submit);
            Ok(())
        }
        ShellCommand::SubmitStaged => {
            runtime.dispatch(Message::Submit);
            Ok(())
        }
        ShellCommand::List => {
            print!("{}", render::queue(&runtime.app().sorted()));
            Ok(())
        }
        ShellCommand::Show(id) => resolve(runtime, &id).map(|id| {
            if let Some(task) = runtime.app().store().get(id) {
                print!("{}", render::detail(task));
            }
        }),
        ShellCommand::Done(id) => {
            resolve(runtime, &id).map(|id| runtime.dispatch(Message::ToggleTaskDone(id)))
        }
        ShellCommand::Remove(id) => {
            resolve(runtime, &id).map(|id| runtime.dispatch(Message::DeleteTask(id)))
        }
        ShellCommand::Edit(id, title) => {
            resolve(runtime, &id).map(|id| runtime.dispatch(Message::UpdateTaskTitle(id, title)))
        }
        ShellCommand::Priority(id) => {
            resolve(runtime, &id).map(|id| runtime.dispatch(Message::CyclePriority(id)))
        }
        ShellCommand::Remind(id, when) => resolve(runtime, &id).map(|id| {
            match parse_when(&when, chrono::Local::now().naive_local()) {
                Some(at) => runtime.dispatch(Message::SetReminder(id, at)),
                None => println!("Could not understand time '{}'", when),
            }
        }),
        ShellCommand::Subtask(id, n) => resolve(runtime, &id).map(|id| {
            match subtask_at(runtime.app().store().get(id), n) {
                Some(sub) => runtime.dispatch(Message::ToggleSubtask(id, sub)),
                None => println!("Task has no subtask {}", n),
            }
        }),
        ShellCommand::Assist(id) => resolve(runtime, &id).map(|id| {
            runtime.dispatch(Message::RequestAssist(id));
            if runtime.app().assisting() != Some(id) {
                println!("Already generating a plan; try again when it finishes");
            }
        }),
        ShellCommand::Paste => {
            runtime.dispatch(Message::PasteFromClipboard);
            Ok(())
        }
        ShellCommand::Dictate => {
            if runtime.app().dictation_available() {
                runtime.dispatch(Message::StartDictation);
            } else {
                println!("Dictation is not configured (set dictation_command)");
            }
            Ok(())
        }
        ShellCommand::Clear => {
            runtime.dispatch(Message::ClearAll);
            if runtime.app().clear_armed() {
                println!(
                    "Clear all {} tasks? Run /clear again within {}s to confirm.",
                    runtime.app().store().len(),
                    config.clear_window().as_secs()
                );
            }
            Ok(())
        }
        ShellCommand::Status => {
            println!("{}", render::status_bar(runtime.app()));
            Ok(())
        }
        ShellCommand::Help => {
            print!("{}", HELP);
            Ok(())
        }
        ShellCommand::Usage(usage) => {
            println!("usage: {}", usage);
            Ok(())
        }
        ShellCommand::Unknown(verb) => {
            println!("Unknown command /{} (try /help)", verb);
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    };

    if let Err(e) = result {
        println!("error: {}", e);
    }
}
