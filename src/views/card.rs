use crate::models::Task;

use super::calendar;
use super::forms::{DEFAULT_CATEGORY, DEFAULT_PRIORITY};

pub struct ReminderLink {
    pub label: String,
    pub calendar_url: Option<String>,
}

/// Everything a task card shows, with defaults applied.
pub struct TaskCardView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub priority: String,
    pub priority_class: &'static str,
    pub status: String,
    pub status_label: String,
    pub due_date: Option<String>,
    pub estimated_minutes: Option<u32>,
    pub score: Option<String>,
    pub reminders: Vec<ReminderLink>,
    pub calendar_url: Option<String>,
    pub can_complete: bool,
    pub completed: bool,
}

pub fn priority_class(priority: &str) -> &'static str {
    match priority.to_lowercase().as_str() {
        "high" => "priority-high",
        "low" => "priority-low",
        _ => "priority-medium",
    }
}

impl TaskCardView {
    pub fn new(task: &Task) -> Self {
        let priority = task
            .priority
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string());

        Self {
            id: task.id.clone(),
            title: task.task.clone(),
            category: task
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            priority_class: priority_class(&priority),
            priority,
            status: task.status.as_str().to_string(),
            status_label: task.status.label().to_string(),
            due_date: task.due_date.clone().filter(|d| !d.is_empty()),
            estimated_minutes: task.estimated_minutes.filter(|m| *m > 0),
            score: task.last_ai_score.filter(|s| *s != 0.0).map(|s| format!("{:.2}", s)),
            reminders: task
                .reminders
                .iter()
                .map(|r| ReminderLink {
                    label: calendar::parse_reminder(r)
                        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                        .unwrap_or_else(|| r.clone()),
                    calendar_url: calendar::reminder_event_url(&task.task, r),
                })
                .collect(),
            calendar_url: calendar::task_event_url(&task.task, task.due_date.as_deref()).ok(),
            can_complete: !task.completed,
            completed: task.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_applies_defaults() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "1",
            "task": "Read chapter 3",
            "status": "in-progress",
            "last_ai_score": 0.8765,
            "reminders": ["2025-03-01T18:00"]
        }))
        .unwrap();

        let card = TaskCardView::new(&task);
        assert_eq!(card.category, "General");
        assert_eq!(card.priority, "Medium");
        assert_eq!(card.priority_class, "priority-medium");
        assert_eq!(card.status_label, "In Progress");
        assert_eq!(card.score.as_deref(), Some("0.88"));
        assert_eq!(card.reminders[0].label, "2025-03-01 18:00 UTC");
        assert!(card.reminders[0].calendar_url.is_some());
        assert!(card.can_complete);
    }

    #[test]
    fn card_links_task_to_calendar_on_due_date() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "2",
            "task": "File taxes",
            "due_date": "2025-04-15"
        }))
        .unwrap();

        let url = TaskCardView::new(&task).calendar_url.unwrap();
        assert!(url.contains("text=File+taxes"));
        assert!(url.contains("dates=20250415%2F20250416"));
    }

    #[test]
    fn priority_class_ignores_case() {
        assert_eq!(priority_class("HIGH"), "priority-high");
        assert_eq!(priority_class("low"), "priority-low");
        assert_eq!(priority_class("urgent"), "priority-medium");
    }
}
