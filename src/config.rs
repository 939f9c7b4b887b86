use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assistant::anthropic::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::persist::TASKS_FILE;

pub const CONFIG_VERSION: u64 = 1;
pub const APP_DIR: &str = "quickcap";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR)
}

fn default_version() -> u64 {
    CONFIG_VERSION
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_clear_confirm_secs() -> u64 {
    3
}

fn default_reminder_poll_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct QuickCapConfig {
    #[serde(default = "default_version")]
    pub version: u64,
    pub data_directory: PathBuf,
    pub model: String,
    pub api_url: String,
    pub clear_confirm_secs: u64,
    pub reminder_poll_secs: u64,
    /// Program that records one utterance and prints the transcript.
    pub dictation_command: Option<String>,
    pub debug_logging: bool,
}

impl Default for QuickCapConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            data_directory: default_data_dir(),
            model: default_model(),
            api_url: default_api_url(),
            clear_confirm_secs: default_clear_confirm_secs(),
            reminder_poll_secs: default_reminder_poll_secs(),
            dictation_command: None,
            debug_logging: false,
        }
    }
}

impl QuickCapConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load, falling back to defaults when the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                log::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_directory.join(TASKS_FILE)
    }

    pub fn clear_window(&self) -> Duration {
        Duration::from_secs(self.clear_confirm_secs.max(1))
    }

    pub fn reminder_poll(&self) -> Duration {
        Duration::from_secs(self.reminder_poll_secs.max(1))
    }
}
