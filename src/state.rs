use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::TaskApi;
use crate::config::FrontendConfig;
use crate::views::{DashboardState, ProfileState};

/// Shared by every handler. When both view locks are needed, `dashboard` is
/// taken before `profile`.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn TaskApi>,
    pub config: Arc<FrontendConfig>,
    pub dashboard: Arc<Mutex<DashboardState>>,
    pub profile: Arc<Mutex<ProfileState>>,
}

impl AppState {
    pub fn new(api: Arc<dyn TaskApi>, config: FrontendConfig) -> Self {
        Self {
            api,
            config: Arc::new(config),
            dashboard: Arc::new(Mutex::new(DashboardState::new())),
            profile: Arc::new(Mutex::new(ProfileState::new())),
        }
    }
}
