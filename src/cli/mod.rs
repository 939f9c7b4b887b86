pub mod handlers;
pub mod render;
pub mod shell;
pub mod when;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quickcap", about = concat!("quickcap v", env!("CARGO_PKG_VERSION"), " - capture now, triage later"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON where supported
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Store tasks in a different directory
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive capture bar (default)
    Shell,
    /// Capture a task from text
    Add(AddArgs),
    /// Capture a task straight from the clipboard
    Paste,
    /// Show the prioritized queue
    List,
    /// Show one task in full
    Show(IdArg),
    /// Toggle a task done / not done
    Done(IdArg),
    /// Delete a task
    Rm(IdArg),
    /// Rename a task
    Edit(EditArgs),
    /// Cycle priority High -> Medium -> Low
    Priority(IdArg),
    /// Set a reminder (e.g. "14:30", "2026-03-01 09:00", "+45m")
    Remind(RemindArgs),
    /// Toggle a subtask by its number
    Subtask(SubtaskArgs),
    /// Ask the assistant for a step-by-step plan
    Assist(IdArg),
    /// Show connection and storage status
    Status,
    /// Manage the assistant API key
    #[command(subcommand)]
    Key(KeyCmd),
}

#[derive(Args)]
pub struct AddArgs {
    /// Free-form text to capture
    #[arg(required_unless_present = "dictate")]
    pub text: Vec<String>,

    /// Append a dictated utterance to the text before capturing
    #[arg(long)]
    pub dictate: bool,
}

#[derive(Args)]
pub struct IdArg {
    /// Task id or unique id prefix
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id or unique id prefix
    pub id: String,
    /// New title
    #[arg(required = true)]
    pub title: Vec<String>,
}

#[derive(Args)]
pub struct RemindArgs {
    /// Task id or unique id prefix
    pub id: String,
    /// When to remind
    #[arg(required = true)]
    pub when: Vec<String>,
}

#[derive(Args)]
pub struct SubtaskArgs {
    /// Task id or unique id prefix
    pub id: String,
    /// Subtask number as shown by `show` (1-based)
    pub number: usize,
}

#[derive(Subcommand)]
pub enum KeyCmd {
    /// Store an API key in the system keyring
    Set { key: String },
    /// Check that the configured key works
    Test,
}
