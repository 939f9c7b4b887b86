use std::path::PathBuf;

use clap::Parser;

use quickcap::cli::handlers::{self, Context};
use quickcap::cli::{Cli, Commands};
use quickcap::config::QuickCapConfig;

/// Journal logger that lets quickcap through at info/debug and everything else at warn.
struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

impl log::Log for FilteredJournal {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if metadata.target().starts_with("quickcap") {
            let max = if quickcap::debug_logging() {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            };
            metadata.level() <= max
        } else {
            metadata.level() <= log::LevelFilter::Warn
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

// `journalctl --user -t quickcap -f`; RUST_LOG on stderr when there is no journal.
fn init_logging() {
    match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => {
            let journal = journal.with_syslog_identifier("quickcap".to_string());
            if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
                // Global max must be Debug so debug logs pass once toggled on.
                log::set_max_level(log::LevelFilter::Debug);
            }
        }
        Err(_) => {
            let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .try_init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    quickcap::set_debug_logging(cli.debug);
    init_logging();

    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(QuickCapConfig::default_path);
    let mut config = QuickCapConfig::load_or_default(&config_path);
    if let Some(dir) = &cli.data_dir {
        config.data_directory = PathBuf::from(dir);
    }
    quickcap::set_debug_logging(cli.debug || config.debug_logging);
    log::debug!("Config {} -> tasks at {}", config_path.display(), config.tasks_path().display());

    let ctx = Context {
        config,
        json: cli.json,
    };
    let command = cli.command.unwrap_or(Commands::Shell);

    if let Err(e) = handlers::dispatch(command, &ctx).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
