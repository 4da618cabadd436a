use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:8002";
pub const DEFAULT_USER_ID: &str = "default_user";

#[derive(Clone, Debug)]
pub struct FrontendConfig {
    pub api_url: String,
    pub bind_addr: SocketAddr,
    pub user_id: String,
    pub timezone: String,
    pub request_timeout: Duration,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            user_id: DEFAULT_USER_ID.to_string(),
            timezone: "UTC".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl FrontendConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        if api_url.is_empty() {
            return Err(AppError::Config("API_URL is empty".to_string()));
        }

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?,
            None => defaults.bind_addr,
        };

        let user_id = lookup("DEFAULT_USER_ID").unwrap_or(defaults.user_id);
        let timezone = lookup("TIMEZONE").unwrap_or(defaults.timezone);

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| AppError::Config(format!("REQUEST_TIMEOUT_SECS is invalid: {}", e)))?,
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_url,
            bind_addr,
            user_id,
            timezone,
            request_timeout,
        })
    }
}
