//! Task input and edit forms.
//!
//! Both forms keep a list of reminder fields the page can grow and shrink;
//! blank reminder fields are dropped on submit.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{AddTaskRequest, EditTaskRequest, Task, TaskStatus};

pub const CATEGORIES: [&str; 9] = [
    "General", "Work", "Personal", "Health", "Study", "Finance", "Home", "Errand", "Other",
];
pub const PRIORITIES: [&str; 3] = ["Low", "Medium", "High"];
pub const RECURRENCES: [&str; 4] = ["daily", "weekly", "monthly", "yearly"];

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Raw `application/x-www-form-urlencoded` body of either form. Reminders
/// arrive one per line.
#[derive(Debug, Default, Deserialize)]
pub struct TaskFormFields {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub estimated_minutes: String,
    #[serde(default)]
    pub recurrence: String,
    #[serde(default)]
    pub reminders: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Checkbox: present when ticked.
    #[serde(default)]
    pub completed: Option<String>,
}

impl TaskFormFields {
    fn reminder_lines(&self) -> Vec<String> {
        let lines: Vec<String> = self.reminders.lines().map(|l| l.trim().to_string()).collect();
        if lines.is_empty() { vec![String::new()] } else { lines }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_minutes(raw: &str) -> Result<Option<u32>, AppError> {
    match optional(raw) {
        None => Ok(None),
        Some(value) => value.parse::<u32>().map(Some).map_err(|_| {
            AppError::Validation(format!("Estimated minutes must be a whole number, got '{}'", value))
        }),
    }
}

fn parse_due_date(raw: &str) -> Result<Option<String>, AppError> {
    match optional(raw) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(|_| Some(value.clone()))
            .map_err(|_| AppError::Validation(format!("Due date must be YYYY-MM-DD, got '{}'", value))),
    }
}

fn required_text(raw: &str) -> Result<String, AppError> {
    optional(raw).ok_or_else(|| AppError::Validation("Task cannot be empty".to_string()))
}

fn filled(reminders: &[String]) -> Vec<String> {
    reminders
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

fn remove_field(reminders: &mut Vec<String>, index: usize) {
    if reminders.len() > 1 && index < reminders.len() {
        reminders.remove(index);
    }
}

fn update_field(reminders: &mut [String], index: usize, value: &str) {
    if let Some(slot) = reminders.get_mut(index) {
        *slot = value.to_string();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskInputForm {
    pub task: String,
    pub due_date: String,
    pub estimated_minutes: String,
    pub recurrence: String,
    pub reminders: Vec<String>,
}

impl Default for TaskInputForm {
    fn default() -> Self {
        Self {
            task: String::new(),
            due_date: String::new(),
            estimated_minutes: String::new(),
            recurrence: String::new(),
            reminders: vec![String::new()],
        }
    }
}

impl From<TaskFormFields> for TaskInputForm {
    fn from(fields: TaskFormFields) -> Self {
        let reminders = fields.reminder_lines();
        Self {
            task: fields.task,
            due_date: fields.due_date,
            estimated_minutes: fields.estimated_minutes,
            recurrence: fields.recurrence,
            reminders,
        }
    }
}

impl TaskInputForm {
    pub fn can_submit(&self) -> bool {
        !self.task.trim().is_empty()
    }

    pub fn add_reminder_field(&mut self) {
        self.reminders.push(String::new());
    }

    /// The last remaining field is never removed.
    pub fn remove_reminder_field(&mut self, index: usize) {
        remove_field(&mut self.reminders, index);
    }

    pub fn update_reminder_field(&mut self, index: usize, value: &str) {
        update_field(&mut self.reminders, index, value);
    }

    /// Builds the add request and resets the form. The form is left as-is
    /// when validation fails.
    pub fn submit(&mut self, user_id: &str) -> Result<AddTaskRequest, AppError> {
        let req = AddTaskRequest {
            user_id: user_id.to_string(),
            task: required_text(&self.task)?,
            due_date: parse_due_date(&self.due_date)?,
            estimated_minutes: parse_minutes(&self.estimated_minutes)?,
            reminders: filled(&self.reminders),
            recurrence: optional(&self.recurrence),
        };
        *self = Self::default();
        Ok(req)
    }

    pub fn success_notice(req: &AddTaskRequest) -> &'static str {
        if req.reminders.is_empty() {
            "Task added successfully!"
        } else {
            "Task added successfully with reminders updated!"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditTaskForm {
    pub id: String,
    pub task: String,
    pub category: String,
    pub priority: String,
    pub due_date: String,
    pub estimated_minutes: String,
    pub completed: bool,
    pub status: TaskStatus,
    pub recurrence: String,
    pub reminders: Vec<String>,
}

impl EditTaskForm {
    pub fn from_task(task: &Task) -> Self {
        let reminders = if task.reminders.is_empty() {
            vec![String::new()]
        } else {
            task.reminders.clone()
        };
        Self {
            id: task.id.clone(),
            task: task.task.clone(),
            category: task
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            priority: task
                .priority
                .clone()
                .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            due_date: task.due_date.clone().unwrap_or_default(),
            estimated_minutes: task
                .estimated_minutes
                .map(|m| m.to_string())
                .unwrap_or_default(),
            completed: task.completed,
            status: task.status.clone(),
            recurrence: task.recurrence.clone().unwrap_or_default(),
            reminders,
        }
    }

    /// Form as posted back by the page for task `id`.
    pub fn from_fields(id: &str, fields: TaskFormFields) -> Self {
        let reminders = fields.reminder_lines();
        Self {
            id: id.to_string(),
            category: fields
                .category
                .and_then(|c| optional(&c))
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            priority: fields
                .priority
                .and_then(|p| optional(&p))
                .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            status: fields
                .status
                .as_deref()
                .and_then(optional)
                .map(|s| TaskStatus::parse(&s))
                .unwrap_or_default(),
            completed: fields.completed.is_some(),
            task: fields.task,
            due_date: fields.due_date,
            estimated_minutes: fields.estimated_minutes,
            recurrence: fields.recurrence,
            reminders,
        }
    }

    pub fn add_reminder_field(&mut self) {
        self.reminders.push(String::new());
    }

    pub fn remove_reminder_field(&mut self, index: usize) {
        remove_field(&mut self.reminders, index);
    }

    pub fn update_reminder_field(&mut self, index: usize, value: &str) {
        update_field(&mut self.reminders, index, value);
    }

    pub fn submit(&self, user_id: &str) -> Result<EditTaskRequest, AppError> {
        if self.id.is_empty() {
            return Err(AppError::Validation("Task ID is required".to_string()));
        }
        Ok(EditTaskRequest {
            id: self.id.clone(),
            user_id: user_id.to_string(),
            task: required_text(&self.task)?,
            category: optional(&self.category),
            priority: optional(&self.priority),
            due_date: parse_due_date(&self.due_date)?,
            estimated_minutes: parse_minutes(&self.estimated_minutes)?,
            completed: self.completed,
            status: Some(self.status.clone()),
            reminders: filled(&self.reminders),
            recurrence: optional(&self.recurrence),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        serde_json::from_value(serde_json::json!({
            "id": "t1",
            "task": "Call the dentist",
            "recurrence": "yearly",
            "estimated_minutes": 15
        }))
        .unwrap()
    }

    #[test]
    fn submit_trims_and_drops_blank_reminders() {
        let mut form = TaskInputForm {
            task: "  Buy milk  ".to_string(),
            due_date: "2025-11-14".to_string(),
            estimated_minutes: "30".to_string(),
            recurrence: String::new(),
            reminders: vec!["2025-11-14T08:00".to_string(), "  ".to_string()],
        };

        let req = form.submit("default_user").unwrap();
        assert_eq!(req.task, "Buy milk");
        assert_eq!(req.estimated_minutes, Some(30));
        assert_eq!(req.reminders, vec!["2025-11-14T08:00".to_string()]);
        assert_eq!(req.recurrence, None);
        assert_eq!(form, TaskInputForm::default());
        assert_eq!(
            TaskInputForm::success_notice(&req),
            "Task added successfully with reminders updated!"
        );
    }

    #[test]
    fn blank_description_is_rejected_and_form_kept() {
        let mut form = TaskInputForm {
            task: "   ".to_string(),
            due_date: "2025-01-01".to_string(),
            ..TaskInputForm::default()
        };
        assert!(!form.can_submit());
        assert!(matches!(form.submit("u"), Err(AppError::Validation(_))));
        assert_eq!(form.due_date, "2025-01-01");
    }

    #[test]
    fn non_numeric_minutes_are_rejected() {
        let mut form = TaskInputForm {
            task: "Run".to_string(),
            estimated_minutes: "half an hour".to_string(),
            ..TaskInputForm::default()
        };
        assert!(matches!(form.submit("u"), Err(AppError::Validation(_))));
    }

    #[test]
    fn last_reminder_field_is_kept() {
        let mut form = TaskInputForm::default();
        form.remove_reminder_field(0);
        assert_eq!(form.reminders.len(), 1);

        form.add_reminder_field();
        form.update_reminder_field(1, "2025-01-01T10:00");
        form.remove_reminder_field(0);
        assert_eq!(form.reminders, vec!["2025-01-01T10:00".to_string()]);
    }

    #[test]
    fn edit_form_applies_defaults() {
        let form = EditTaskForm::from_task(&sample_task());
        assert_eq!(form.category, "General");
        assert_eq!(form.priority, "Medium");
        assert_eq!(form.status, TaskStatus::Pending);
        assert_eq!(form.reminders, vec![String::new()]);
        assert_eq!(form.estimated_minutes, "15");
    }

    #[test]
    fn edit_submit_keeps_recurrence() {
        let form = EditTaskForm::from_task(&sample_task());
        let req = form.submit("default_user").unwrap();
        assert_eq!(req.id, "t1");
        assert_eq!(req.recurrence.as_deref(), Some("yearly"));
        assert!(req.reminders.is_empty());
        assert_eq!(req.status, Some(TaskStatus::Pending));
    }

    #[test]
    fn posted_fields_parse_checkbox_and_reminders() {
        let fields = TaskFormFields {
            task: "Stretch".to_string(),
            reminders: "2025-02-01T07:00\n\n2025-02-02T07:00".to_string(),
            status: Some("in-progress".to_string()),
            completed: Some("on".to_string()),
            ..TaskFormFields::default()
        };
        let form = EditTaskForm::from_fields("t9", fields);
        assert!(form.completed);
        assert_eq!(form.status, TaskStatus::InProgress);

        let req = form.submit("default_user").unwrap();
        assert_eq!(req.reminders.len(), 2);
    }
}
