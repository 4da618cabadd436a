//! Google Calendar "create event" links for tasks and reminders.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use reqwest::Url;

use crate::error::AppError;

const CALENDAR_BASE: &str = "https://calendar.google.com/calendar/render";

fn template_url(title: &str, details: &str, dates: &str) -> Result<String, AppError> {
    let url = Url::parse_with_params(
        CALENDAR_BASE,
        &[
            ("action", "TEMPLATE"),
            ("text", title),
            ("details", details),
            ("dates", dates),
        ],
    )
    .map_err(|_| AppError::InternalServerError)?;
    Ok(url.into())
}

/// Reminder values come from `datetime-local` inputs (no offset, read as
/// UTC) or from the backend as RFC 3339.
pub fn parse_reminder(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn compact(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// All-day event on the due date, or today when the task has none.
pub fn task_event_url(task: &str, due_date: Option<&str>) -> Result<String, AppError> {
    let day = due_date
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive());
    let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
    let dates = format!("{}/{}", day.format("%Y%m%d"), next.format("%Y%m%d"));
    template_url(task, &format!("Task: {}", task), &dates)
}

/// Zero-length event at the reminder time; `None` if the time is unreadable.
pub fn reminder_event_url(task: &str, reminder: &str) -> Option<String> {
    let at = compact(parse_reminder(reminder)?);
    template_url(
        &format!("Reminder: {}", task),
        &format!("Reminder for: {}", task),
        &format!("{}/{}", at, at),
    )
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_formats_compact_utc() {
        let url = reminder_event_url("Water plants", "2025-11-14T08:30").unwrap();
        assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
        assert!(url.contains("dates=20251114T083000Z%2F20251114T083000Z"));
        assert!(url.contains("text=Reminder%3A+Water+plants"));
    }

    #[test]
    fn reminder_with_offset_is_converted() {
        let at = parse_reminder("2025-11-14T10:00:00+02:00").unwrap();
        assert_eq!(compact(at), "20251114T080000Z");
        assert!(reminder_event_url("x", "tomorrow").is_none());
    }

    #[test]
    fn task_event_spans_the_due_day() {
        let url = task_event_url("File taxes", Some("2025-04-15")).unwrap();
        assert!(url.contains("dates=20250415%2F20250416"));
    }
}
