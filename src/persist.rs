use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::{Arc, Mutex};

use crate::core::task::Task;

pub const TASKS_FILE: &str = "tasks.json";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable storage for the whole task collection.
///
/// `load` never fails: a missing or unreadable value is reported as absent so
/// startup can continue with an empty queue.
pub trait TaskBackend {
    fn load(&self) -> Option<Vec<Task>>;
    fn save(&self, tasks: &[Task]) -> Result<(), PersistError>;
}

/// Pretty-printed JSON array in the data directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TASKS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TaskBackend for JsonFileBackend {
    fn load(&self) -> Option<Vec<Task>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(tasks) => Some(tasks),
            Err(e) => {
                log::warn!("Ignoring corrupt task file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(tasks)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        // Write-then-rename so a crash never leaves a truncated file behind.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        Ok(())
    }
}

/// In-process backend, shared by clone, so tests can observe saves.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MemoryState {
    stored: Option<Vec<Task>>,
    saves: usize,
}

#[cfg(test)]
impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let backend = Self::default();
        if let Ok(mut state) = backend.inner.lock() {
            state.stored = Some(tasks);
        }
        backend
    }

    pub fn stored(&self) -> Option<Vec<Task>> {
        self.inner.lock().ok().and_then(|s| s.stored.clone())
    }

    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|s| s.saves).unwrap_or(0)
    }
}

#[cfg(test)]
impl TaskBackend for MemoryBackend {
    fn load(&self) -> Option<Vec<Task>> {
        self.stored()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistError> {
        if let Ok(mut state) = self.inner.lock() {
            state.stored = Some(tasks.to_vec());
            state.saves += 1;
        }
        Ok(())
    }
}
