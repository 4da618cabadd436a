use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Reminded,
    Snoozed,
    /// Anything else the backend sends, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Reminded,
        TaskStatus::Snoozed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Reminded => "reminded",
            TaskStatus::Snoozed => "snoozed",
            TaskStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Reminded => "Reminded",
            TaskStatus::Snoozed => "Snoozed",
            TaskStatus::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => TaskStatus::Pending,
            "in-progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "reminded" => TaskStatus::Reminded,
            "snoozed" => TaskStatus::Snoozed,
            other => TaskStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub reminders: Vec<String>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub snooze_count: u32,
    #[serde(default)]
    pub last_ai_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTaskRequest {
    pub user_id: String,
    pub task: String,
    pub due_date: Option<String>,
    pub estimated_minutes: Option<u32>,
    pub reminders: Vec<String>,
    pub recurrence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditTaskRequest {
    pub id: String,
    pub user_id: String,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub estimated_minutes: Option<u32>,
    pub completed: bool,
    pub status: Option<TaskStatus>,
    pub reminders: Vec<String>,
    pub recurrence: Option<String>,
}

impl EditTaskRequest {
    /// Edit that marks `task` done while carrying every other field over.
    pub fn completing(task: &Task, fallback_user: &str) -> Self {
        Self {
            id: task.id.clone(),
            user_id: task
                .user_id
                .clone()
                .unwrap_or_else(|| fallback_user.to_string()),
            task: task.task.clone(),
            category: task.category.clone(),
            priority: task.priority.clone(),
            due_date: task.due_date.clone(),
            estimated_minutes: task.estimated_minutes,
            completed: true,
            status: Some(TaskStatus::Completed),
            reminders: task.reminders.clone(),
            recurrence: task.recurrence.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_defaults_missing_fields() {
        let task: Task = serde_json::from_str(r#"{"id":"1","task":"Write report"}"#).unwrap();
        assert!(!task.completed);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.reminders.is_empty());
        assert_eq!(task.snooze_count, 0);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let task: Task =
            serde_json::from_str(r#"{"id":"1","task":"x","status":"archived"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Other("archived".to_string()));
        assert_eq!(task.status.label(), "archived");

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "archived");
    }

    #[test]
    fn in_progress_uses_kebab_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, r#""in-progress""#);
        assert_eq!(TaskStatus::parse("in-progress"), TaskStatus::InProgress);
    }

    #[test]
    fn completing_carries_fields_over() {
        let task = Task {
            id: "42".to_string(),
            task: "Pay rent".to_string(),
            category: Some("Finance".to_string()),
            priority: Some("High".to_string()),
            completed: false,
            due_date: Some("2025-11-30".to_string()),
            user_id: None,
            created_at: None,
            updated_at: None,
            reminders: vec!["2025-11-29T09:00".to_string()],
            recurrence: Some("monthly".to_string()),
            estimated_minutes: Some(10),
            status: TaskStatus::Pending,
            snooze_count: 0,
            last_ai_score: None,
        };

        let edit = EditTaskRequest::completing(&task, "default_user");
        assert_eq!(edit.user_id, "default_user");
        assert!(edit.completed);
        assert_eq!(edit.status, Some(TaskStatus::Completed));
        assert_eq!(edit.recurrence.as_deref(), Some("monthly"));
        assert_eq!(edit.category.as_deref(), Some("Finance"));
        assert_eq!(edit.priority.as_deref(), Some("High"));
        assert_eq!(edit.reminders, task.reminders);
    }
}
