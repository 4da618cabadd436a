use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMethods {
    #[serde(default = "enabled")]
    pub webpush: bool,
    #[serde(default = "enabled")]
    pub email: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationMethods {
    fn default() -> Self {
        Self {
            webpush: true,
            email: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub notification_methods: NotificationMethods,
    #[serde(default)]
    pub behavior_stats: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_embedding: Option<Vec<f64>>,
    #[serde(default)]
    pub created_at: String,
}

impl User {
    pub fn new_default(id: &str, timezone: &str) -> Self {
        Self {
            id: id.to_string(),
            name: "Default User".to_string(),
            timezone: timezone.to_string(),
            notification_methods: NotificationMethods::default(),
            behavior_stats: Map::new(),
            user_embedding: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}
