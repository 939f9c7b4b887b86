use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    #[cfg(test)]
    pub const ALL: [Priority; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// High -> Medium -> Low -> High.
    pub fn next(&self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low => Self::High,
        }
    }

    /// Higher ranks sort first in the queue.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the captured text came from. Recorded at creation, never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Voice,
    Clipboard,
    Manual,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Voice => "voice",
            Self::Clipboard => "clipboard",
            Self::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Uuid,
    pub title: String,
    pub is_completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_completed: false,
        }
    }
}

/// Deep-dive plan generated on request for a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAssistance {
    pub steps: Vec<String>,
    pub pro_tip: String,
    pub search_query: String,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub priority: Priority,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_remark: Option<String>,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_assistance: Option<AiAssistance>,
}

impl Task {
    pub fn new(title: impl Into<String>, category: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            category: category.into(),
            priority,
            subtasks: Vec::new(),
            is_completed: false,
            created_at: chrono::Local::now().naive_local(),
            ai_remark: None,
            source: Source::Manual,
            links: None,
            reminder_time: None,
            ai_assistance: None,
        }
    }

    pub fn with_subtasks<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks = titles.into_iter().map(Subtask::new).collect();
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.is_completed).count()
    }

    /// True when a reminder is set, has passed, and the task is still open.
    pub fn reminder_due(&self, now: NaiveDateTime) -> bool {
        !self.is_completed && self.reminder_time.is_some_and(|t| t <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_cycle_wraps() {
        assert_eq!(Priority::High.next(), Priority::Medium);
        assert_eq!(Priority::Medium.next(), Priority::Low);
        assert_eq!(Priority::Low.next(), Priority::High);
    }

    #[test]
    fn three_cycles_return_to_start() {
        for p in Priority::ALL {
            assert_eq!(p.next().next().next(), p);
        }
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let task = Task::new("Call mom", "Inbox", Priority::Medium);
        let json = serde_json::to_value(&task).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("links"));
        assert!(!obj.contains_key("reminderTime"));
        assert!(!obj.contains_key("aiAssistance"));
        assert!(!obj.contains_key("aiRemark"));
        assert_eq!(obj["isCompleted"], false);
        assert_eq!(obj["source"], "manual");
        assert_eq!(obj["priority"], "Medium");
    }

    #[test]
    fn empty_links_stay_distinct_from_absent() {
        let mut task = Task::new("Read", "Personal", Priority::Low);
        task.links = Some(Vec::new());
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back.links, Some(Vec::new()));
    }

    #[test]
    fn reminder_due_only_when_open_and_past() {
        let now = chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut task = Task::new("Stand-up", "Work", Priority::High);
        assert!(!task.reminder_due(now));

        task.reminder_time = Some(now - chrono::Duration::minutes(1));
        assert!(task.reminder_due(now));

        task.is_completed = true;
        assert!(!task.reminder_due(now));

        task.is_completed = false;
        task.reminder_time = Some(now + chrono::Duration::minutes(1));
        assert!(!task.reminder_due(now));
    }
}
