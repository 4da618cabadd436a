use serde::Deserialize;
use serde_json::Value;

use crate::models::Task;

/// `{"task": {...}}` envelope returned by add/edit.
#[derive(Debug, Deserialize)]
pub struct TaskEnvelope {
    pub task: Task,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Error body; `detail` is a string for handled errors and a list for
/// request validation failures.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
