use chrono::{DateTime, Utc};
use serde_json::Value;

use super::insights::UNCATEGORIZED;
use crate::error::AppError;
use crate::models::AiSuggestion;

pub struct CategorizedRow {
    pub task: String,
    pub category: String,
    pub priority: String,
    pub score: Option<String>,
}

pub struct ScheduleRow {
    pub task: String,
    pub start: String,
    pub end: String,
    pub reason: String,
}

pub struct ReminderRow {
    pub task: String,
    pub at: String,
    pub method: String,
}

/// Display rows for the suggestions panel.
pub struct SuggestionsView {
    pub categorized: Vec<CategorizedRow>,
    pub schedule: Vec<ScheduleRow>,
    pub reminders: Vec<ReminderRow>,
    pub next_task: Option<String>,
    pub explanation: Option<String>,
}

fn format_instant(raw: &str, pattern: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).format(pattern).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn next_task_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("task")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(value.to_string())),
        other => Some(other.to_string()),
    }
}

impl SuggestionsView {
    pub fn new(suggestion: &AiSuggestion) -> Self {
        Self {
            categorized: suggestion
                .categorized
                .iter()
                .map(|item| CategorizedRow {
                    task: item.task.clone(),
                    category: item
                        .category
                        .clone()
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| UNCATEGORIZED.to_string()),
                    priority: item
                        .priority
                        .clone()
                        .filter(|p| !p.is_empty())
                        .unwrap_or_else(|| "—".to_string()),
                    score: item.score.filter(|s| *s != 0.0).map(|s| format!("{:.2}", s)),
                })
                .collect(),
            schedule: suggestion
                .schedule_plan
                .iter()
                .map(|item| ScheduleRow {
                    task: item.task.clone(),
                    start: format_instant(&item.start_iso, "%Y-%m-%d %H:%M UTC"),
                    end: format_instant(&item.end_iso, "%H:%M UTC"),
                    reason: item.reason.clone(),
                })
                .collect(),
            reminders: suggestion
                .reminder_recs
                .iter()
                .map(|item| ReminderRow {
                    task: item.task.clone(),
                    at: format_instant(&item.reminder_iso, "%Y-%m-%d %H:%M UTC"),
                    method: item.method.clone(),
                })
                .collect(),
            next_task: suggestion.next_task.as_ref().and_then(next_task_text),
            explanation: suggestion
                .explanation
                .clone()
                .filter(|e| !e.trim().is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categorized.is_empty()
            && self.schedule.is_empty()
            && self.reminders.is_empty()
            && self.next_task.is_none()
    }
}

/// User-facing message for a failed suggestion request.
pub fn describe_ai_failure(err: &AppError) -> String {
    let detail = err.detail();
    if detail.contains("API key") {
        format!(
            "Google API key not configured. Please set your API key in the backend .env file. {}",
            detail
        )
    } else if detail.contains("quota") || detail.contains("429") {
        "Google API quota exceeded. Please check your plan and billing details".to_string()
    } else {
        format!("AI suggestion failed: {}", detail)
    }
}
