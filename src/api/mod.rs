pub mod dto;
pub mod memory;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::FrontendConfig;
use crate::error::AppError;
use crate::models::{
    AddTaskRequest, AiSuggestRequest, AiSuggestion, ApplyScheduleRequest, DeleteTaskRequest,
    EditTaskRequest, Task, User,
};

pub use memory::InMemoryTaskApi;

/// The backend as seen from the front-end. Every call is a single request.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;
    async fn add_task(&self, req: &AddTaskRequest) -> Result<Task, AppError>;
    async fn edit_task(&self, req: &EditTaskRequest) -> Result<Task, AppError>;
    async fn delete_task(&self, req: &DeleteTaskRequest) -> Result<(), AppError>;
    async fn get_user(&self, user_id: &str) -> Result<User, AppError>;
    async fn create_user(&self, user: &User) -> Result<User, AppError>;
    async fn update_user(&self, user: &User) -> Result<User, AppError>;
    async fn ai_suggest(&self, req: &AiSuggestRequest) -> Result<AiSuggestion, AppError>;
    /// Returns the backend's confirmation message.
    async fn apply_schedule(&self, req: &ApplyScheduleRequest) -> Result<String, AppError>;
}

pub struct HttpTaskApi {
    client: Client,
    base_url: Url,
}

impl HttpTaskApi {
    pub fn new(config: &FrontendConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| AppError::Config(format!("API_URL is invalid: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("API_URL is not a base URL: {}", base_url)));
        }
        Ok(Self { client, base_url })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("API_URL is not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        let url = self.url(segments)?;
        debug!("GET {}", url.path());
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn send_json<B, T>(
        &self,
        method: reqwest::Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AppError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(segments)?;
        debug!("{} {}", method, url.path());
        let response = self
            .client
            .request(method, url)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<dto::ErrorBody>(&body)
                .map(|e| e.message())
                .unwrap_or(body);
            warn!("backend returned {}: {}", status, detail);
            return Err(AppError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse backend response: {}", e);
            AppError::Decode(e)
        })
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        // The backend may answer `null` for an empty collection.
        let tasks: Option<Vec<Task>> = self.get_json(&["tasks"]).await?;
        Ok(tasks.unwrap_or_default())
    }

    async fn add_task(&self, req: &AddTaskRequest) -> Result<Task, AppError> {
        let envelope: dto::TaskEnvelope = self
            .send_json(reqwest::Method::POST, &["add-task"], req)
            .await?;
        Ok(envelope.task)
    }

    async fn edit_task(&self, req: &EditTaskRequest) -> Result<Task, AppError> {
        let envelope: dto::TaskEnvelope = self
            .send_json(reqwest::Method::POST, &["edit-task"], req)
            .await?;
        Ok(envelope.task)
    }

    async fn delete_task(&self, req: &DeleteTaskRequest) -> Result<(), AppError> {
        let _: dto::MessageResponse = self
            .send_json(reqwest::Method::POST, &["delete-task"], req)
            .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, AppError> {
        self.get_json(&["users", user_id]).await
    }

    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        self.send_json(reqwest::Method::POST, &["users"], user).await
    }

    async fn update_user(&self, user: &User) -> Result<User, AppError> {
        self.send_json(reqwest::Method::PUT, &["users", user.id.as_str()], user)
            .await
    }

    async fn ai_suggest(&self, req: &AiSuggestRequest) -> Result<AiSuggestion, AppError> {
        self.send_json(reqwest::Method::POST, &["ai-suggest"], req)
            .await
    }

    async fn apply_schedule(&self, req: &ApplyScheduleRequest) -> Result<String, AppError> {
        let response: dto::MessageResponse = self
            .send_json(reqwest::Method::POST, &["apply-schedule"], req)
            .await?;
        Ok(response.message)
    }
}
