use std::cmp::Reverse;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::task::{AiAssistance, Priority, Task};
use crate::persist::TaskBackend;

/// Emitted when a task flips to completed. Flipping back emits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub task_id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no task matches '{0}'")]
    NotFound(String),
    #[error("'{0}' matches {1} tasks; use a longer id")]
    Ambiguous(String, usize),
}

/// Authoritative task collection, most recent first.
///
/// Every mutation that changes something writes the full collection to the
/// backend. Save failures are logged and otherwise ignored; the next mutation
/// writes a fresh snapshot anyway.
pub struct TaskStore {
    tasks: Vec<Task>,
    backend: Box<dyn TaskBackend>,
}

impl TaskStore {
    pub fn open(backend: impl TaskBackend + 'static) -> Self {
        let tasks = backend.load().unwrap_or_default();
        log::info!("Loaded {} tasks", tasks.len());
        Self {
            tasks,
            backend: Box::new(backend),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks still open.
    pub fn queue_len(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed).count()
    }

    pub fn add(&mut self, task: Task) {
        log::debug!("Adding task {} ({})", task.id, task.title);
        self.tasks.insert(0, task);
        self.save();
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    /// Replace the task with the same id wholesale.
    pub fn update(&mut self, task: Task) -> bool {
        self.mutate(task.id, |slot| *slot = task)
    }

    pub fn toggle_complete(&mut self, id: Uuid) -> Option<Completion> {
        let mut completion = None;
        self.mutate(id, |task| {
            task.is_completed = !task.is_completed;
            if task.is_completed {
                completion = Some(Completion {
                    task_id: task.id,
                    title: task.title.clone(),
                });
            }
        });
        completion
    }

    /// Blank titles are rejected.
    pub fn edit_title(&mut self, id: Uuid, title: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        self.mutate(id, |task| task.title = title.to_string())
    }

    pub fn cycle_priority(&mut self, id: Uuid) -> Option<Priority> {
        let mut next = None;
        self.mutate(id, |task| {
            task.priority = task.priority.next();
            next = Some(task.priority);
        });
        next
    }

    pub fn set_reminder(&mut self, id: Uuid, at: NaiveDateTime) -> bool {
        self.mutate(id, |task| task.reminder_time = Some(at))
    }

    pub fn toggle_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return false;
        };
        let Some(subtask) = task.subtasks.iter_mut().find(|s| s.id == subtask_id) else {
            return false;
        };
        subtask.is_completed = !subtask.is_completed;
        self.save();
        true
    }

    /// Overwrites any previous plan.
    pub fn attach_assistance(&mut self, id: Uuid, assistance: AiAssistance) -> bool {
        self.mutate(id, |task| task.ai_assistance = Some(assistance))
    }

    pub fn clear(&mut self) {
        log::info!("Clearing {} tasks", self.tasks.len());
        self.tasks.clear();
        self.save();
    }

    /// Display order: open before completed, then High > Medium > Low.
    /// The sort is stable, so ties keep their stored (most recent first) order.
    pub fn sorted(&self) -> Vec<&Task> {
        let mut view: Vec<&Task> = self.tasks.iter().collect();
        view.sort_by_key(|t| (t.is_completed, Reverse(t.priority.rank())));
        view
    }

    /// Resolve a full id or unique id prefix.
    pub fn resolve(&self, prefix: &str) -> Result<Uuid, ResolveError> {
        let needle = prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(ResolveError::NotFound(prefix.to_string()));
        }
        let matches: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|t| t.id.to_string().starts_with(&needle))
            .map(|t| t.id)
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(ResolveError::NotFound(prefix.to_string())),
            many => Err(ResolveError::Ambiguous(prefix.to_string(), many.len())),
        }
    }

    fn mutate(&mut self, id: Uuid, f: impl FnOnce(&mut Task)) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                f(task);
                self.save();
                true
            }
            None => {
                log::debug!("Ignoring mutation for unknown task {}", id);
                false
            }
        }
    }

    fn save(&self) {
        if let Err(e) = self.backend.save(&self.tasks) {
            log::error!("Failed to save tasks: {}", e);
        }
    }
}
