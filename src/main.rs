use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskflow::api::HttpTaskApi;
use taskflow::config::FrontendConfig;
use taskflow::routes::router;
use taskflow::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "taskflow=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FrontendConfig::new_from_env()?;
    let api = Arc::new(HttpTaskApi::new(&config)?);
    info!("using backend at {}", config.api_url);

    let addr = config.bind_addr;
    let app = router(AppState::new(api, config));

    info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
