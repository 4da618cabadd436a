use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The backend answered with a non-success status.
    #[error("Backend error {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl AppError {
    /// Message suitable for showing to the user, without the error-kind prefix.
    pub fn detail(&self) -> String {
        match self {
            AppError::Api { detail, .. } => detail.clone(),
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::Config(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Api { status, detail } => {
                error!("backend error {}: {}", status, detail);
                (StatusCode::BAD_GATEWAY, detail)
            }
            AppError::Http(e) => {
                error!("backend unreachable: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Backend is unreachable".to_string(),
                )
            }
            AppError::Decode(e) => {
                error!("decode error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Backend sent an unexpected response".to_string(),
                )
            }
            AppError::Config(msg) => {
                error!("configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}
