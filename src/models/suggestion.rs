use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Task;

pub const DEFAULT_USER_INPUT: &str = "What should I do next?";

// Items come straight from the model's JSON, so a missing or oddly typed
// field degrades to a default rather than failing the whole suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedTask {
    #[serde(default, deserialize_with = "lenient_string")]
    pub task: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePlan {
    #[serde(default, deserialize_with = "lenient_string")]
    pub task: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_iso: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_iso: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRec {
    #[serde(default, deserialize_with = "lenient_string")]
    pub task: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reminder_iso: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub method: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSuggestion {
    #[serde(default)]
    pub categorized: Vec<CategorizedTask>,
    #[serde(default)]
    pub schedule_plan: Vec<SchedulePlan>,
    #[serde(default)]
    pub reminder_recs: Vec<ReminderRec>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub next_task: Option<Value>,
}

/// Completion history the backend uses to rank tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub avg_completion_time: f64,
    pub priority_completion_rate: BTreeMap<String, f64>,
    pub category_completion_rate: BTreeMap<String, f64>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            avg_completion_time: 45.0,
            priority_completion_rate: BTreeMap::from([
                ("High".to_string(), 0.7),
                ("Medium".to_string(), 0.5),
                ("Low".to_string(), 0.3),
            ]),
            category_completion_rate: BTreeMap::from([
                ("Work".to_string(), 0.6),
                ("Health".to_string(), 0.8),
            ]),
        }
    }
}

impl UserStats {
    /// Reads stats out of a user's free-form `behavior_stats`, falling back to
    /// the defaults for anything missing or malformed.
    pub fn from_behavior(stats: &Map<String, Value>) -> Self {
        let mut out = Self::default();
        if let Some(avg) = stats.get("avg_completion_time").and_then(Value::as_f64) {
            out.avg_completion_time = avg;
        }
        if let Some(rates) = stats
            .get("priority_completion_rate")
            .and_then(|v| serde_json::from_value::<BTreeMap<String, f64>>(v.clone()).ok())
        {
            out.priority_completion_rate = rates;
        }
        if let Some(rates) = stats
            .get("category_completion_rate")
            .and_then(|v| serde_json::from_value::<BTreeMap<String, f64>>(v.clone()).ok())
        {
            out.category_completion_rate = rates;
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSuggestRequest {
    pub tasks: Vec<Task>,
    pub user_stats: UserStats,
    pub now: String,
    pub timezone: String,
    pub user_input: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyScheduleRequest {
    pub schedule_plan: Vec<SchedulePlan>,
}
