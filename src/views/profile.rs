use serde::Deserialize;
use tracing::{info, warn};

use super::dashboard::Notice;
use crate::api::TaskApi;
use crate::error::AppError;
use crate::models::{NotificationMethods, User};

pub const TIMEZONES: [(&str, &str); 9] = [
    ("UTC", "UTC"),
    ("America/New_York", "Eastern Time"),
    ("America/Chicago", "Central Time"),
    ("America/Denver", "Mountain Time"),
    ("America/Los_Angeles", "Pacific Time"),
    ("Europe/London", "London"),
    ("Europe/Paris", "Paris"),
    ("Asia/Tokyo", "Tokyo"),
    ("Asia/Shanghai", "Shanghai"),
];

/// Posted profile form; checkboxes are present only when ticked.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub webpush: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub return_to: Option<String>,
}

impl ProfileFields {
    pub fn notification_methods(&self) -> NotificationMethods {
        NotificationMethods {
            webpush: self.webpush.is_some(),
            email: self.email.is_some(),
        }
    }

    /// Page to go back to after saving; only known pages are honoured.
    pub fn return_page(&self) -> &'static str {
        match self.return_to.as_deref() {
            Some("/profile") => "/profile",
            _ => "/dashboard",
        }
    }
}

/// Profile panel for the single hardcoded user.
#[derive(Debug, Default)]
pub struct ProfileState {
    user: Option<User>,
    pub editing: bool,
    notice: Option<Notice>,
}

impl ProfileState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Loads the user, creating the default profile when the backend has none.
    pub async fn load(
        &mut self,
        api: &dyn TaskApi,
        user_id: &str,
        timezone: &str,
    ) -> Result<&User, AppError> {
        let user = match api.get_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Error loading user {}: {}; creating default profile", user_id, e);
                let created = api
                    .create_user(&User::new_default(user_id, timezone))
                    .await
                    .inspect_err(|e| warn!("Error creating user: {}", e))?;
                info!("created default user {}", created.id);
                created
            }
        };
        Ok(self.user.insert(with_fallbacks(user, timezone)))
    }

    async fn put(&mut self, api: &dyn TaskApi, user: User, ok: &str, failed: &str) -> Result<(), AppError> {
        match api.update_user(&user).await {
            Ok(updated) => {
                self.user = Some(updated);
                self.notice = Some(Notice::info(ok));
                Ok(())
            }
            Err(e) => {
                warn!("{}: {}", failed, e);
                self.notice = Some(Notice::error(failed));
                Err(e)
            }
        }
    }

    fn current(&self) -> Result<User, AppError> {
        self.user
            .clone()
            .ok_or_else(|| AppError::NotFound("Profile is not loaded".to_string()))
    }

    /// Saves name, timezone and notification methods together.
    pub async fn update(
        &mut self,
        api: &dyn TaskApi,
        fields: &ProfileFields,
    ) -> Result<(), AppError> {
        let mut user = self.current()?;
        if let Some(name) = fields.name.as_deref() {
            user.name = name.trim().to_string();
        }
        if let Some(timezone) = fields.timezone.as_deref().filter(|t| !t.is_empty()) {
            user.timezone = timezone.to_string();
        }
        user.notification_methods = fields.notification_methods();

        self.put(api, user, "Profile updated successfully!", "Failed to update profile")
            .await?;
        self.editing = false;
        Ok(())
    }

    /// Saves only the notification methods over the stored profile.
    pub async fn update_notifications(
        &mut self,
        api: &dyn TaskApi,
        methods: NotificationMethods,
    ) -> Result<(), AppError> {
        let mut user = self.current()?;
        user.notification_methods = methods;
        self.put(
            api,
            user,
            "Notification preferences updated!",
            "Failed to update notification preferences",
        )
        .await
    }
}

fn with_fallbacks(mut user: User, timezone: &str) -> User {
    if user.timezone.is_empty() {
        user.timezone = timezone.to_string();
    }
    user
}
