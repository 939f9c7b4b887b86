use std::fmt::Write;

use crate::app::{App, Toast, ToastKind};
use crate::core::task::{Priority, Task};

const SHORT_ID: usize = 8;
const TIME_FMT: &str = "%Y-%m-%d %H:%M";

pub fn short_id(task: &Task) -> String {
    task.id.to_string()[..SHORT_ID].to_string()
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "!!!",
        Priority::Medium => "!! ",
        Priority::Low => "!  ",
    }
}

/// One line per task, in display order.
pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "{}  [{}] {} {}  #{}",
        short_id(task),
        if task.is_completed { "x" } else { " " },
        priority_marker(task.priority),
        task.title,
        task.category,
    );
    if !task.subtasks.is_empty() {
        let _ = write!(line, "  ({}/{})", task.completed_subtasks(), task.subtasks.len());
    }
    if let Some(at) = task.reminder_time {
        let _ = write!(line, "  @ {}", at.format(TIME_FMT));
    }
    if task.ai_assistance.is_some() {
        line.push_str("  +plan");
    }
    line
}

pub fn queue(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "Ready to capture. Type a task or paste a link to begin.\n".to_string();
    }
    let open = tasks.iter().filter(|t| !t.is_completed).count();
    let mut out = format!("Your Queue ({})\n", open);
    for task in tasks {
        out.push_str("  ");
        out.push_str(&task_line(task));
        out.push('\n');
    }
    out
}

pub fn detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", task.title);
    let _ = writeln!(out, "  id:       {}", task.id);
    let _ = writeln!(
        out,
        "  status:   {}",
        if task.is_completed { "done" } else { "open" }
    );
    let _ = writeln!(out, "  priority: {}", task.priority);
    let _ = writeln!(out, "  category: {}", task.category);
    let _ = writeln!(out, "  source:   {}", task.source.as_str());
    let _ = writeln!(out, "  created:  {}", task.created_at.format(TIME_FMT));
    if let Some(at) = task.reminder_time {
        let _ = writeln!(out, "  reminder: {}", at.format(TIME_FMT));
    }
    if let Some(desc) = &task.description {
        let _ = writeln!(out, "\n  {}", desc);
    }
    if let Some(remark) = &task.ai_remark {
        let _ = writeln!(out, "\n  > {}", remark);
    }
    if let Some(links) = task.links.as_ref().filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "\n  Links:");
        for link in links {
            let _ = writeln!(out, "    {}", link);
        }
    }
    if !task.subtasks.is_empty() {
        let _ = writeln!(out, "\n  Subtasks:");
        for (i, sub) in task.subtasks.iter().enumerate() {
            let _ = writeln!(
                out,
                "    {}. [{}] {}",
                i + 1,
                if sub.is_completed { "x" } else { " " },
                sub.title
            );
        }
    }
    if let Some(plan) = &task.ai_assistance {
        let _ = writeln!(out, "\n  Plan:");
        for (i, step) in plan.steps.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", i + 1, step);
        }
        let _ = writeln!(out, "  Pro tip: {}", plan.pro_tip);
        let _ = writeln!(out, "  Search:  {}", plan.search_query);
        if !plan.resources.is_empty() {
            let _ = writeln!(out, "  See:     {}", plan.resources.join(", "));
        }
    }
    out
}

pub fn toast(toast: &Toast) -> String {
    match toast.kind {
        ToastKind::Success => format!("* {}", toast.message),
        ToastKind::Info => format!("i {}", toast.message),
    }
}

/// Status strip shown above the shell prompt.
pub fn status_bar(app: &App) -> String {
    let mut parts = vec![if app.is_connected() {
        "Connected"
    } else {
        "Offline"
    }
    .to_string()];
    if app.is_analyzing() {
        parts.push("analyzing...".to_string());
    }
    if app.is_listening() {
        parts.push("listening...".to_string());
    }
    if app.assisting().is_some() {
        parts.push("planning...".to_string());
    }
    if app.clear_armed() {
        parts.push("clear again to confirm".to_string());
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::AiAssistance;

    #[test]
    fn line_shows_progress_and_plan() {
        let mut task = Task::new("Plan trip", "Personal", Priority::High)
            .with_subtasks(["Book flight", "Pack"]);
        task.subtasks[0].is_completed = true;
        task.ai_assistance = Some(AiAssistance {
            steps: vec![],
            pro_tip: String::new(),
            search_query: String::new(),
            resources: vec![],
        });
        let line = task_line(&task);
        assert!(line.starts_with(&short_id(&task)));
        assert!(line.contains("[ ] !!! Plan trip  #Personal"));
        assert!(line.contains("(1/2)"));
        assert!(line.ends_with("+plan"));
    }

    #[test]
    fn queue_header_counts_open_tasks() {
        let open = Task::new("a", "Inbox", Priority::Low);
        let mut done = Task::new("b", "Inbox", Priority::High);
        done.is_completed = true;
        let out = queue(&[&open, &done]);
        assert!(out.starts_with("Your Queue (1)\n"));
        assert_eq!(out.lines().count(), 3);
        assert!(queue(&[]).starts_with("Ready to capture"));
    }

    #[test]
    fn detail_numbers_subtasks() {
        let task = Task::new("Plan trip", "Personal", Priority::High).with_subtasks(["Book", "Pack"]);
        let out = detail(&task);
        assert!(out.contains("    1. [ ] Book\n"));
        assert!(out.contains("    2. [ ] Pack\n"));
        assert!(!out.contains("Plan:"));
    }
}
