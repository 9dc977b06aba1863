use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use resume_analyzer::config::Config;
use resume_analyzer::llm_client::{self, GeminiClient};
use resume_analyzer::routes::build_router;
use resume_analyzer::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    resume_analyzer::init_tracing(&config.rust_log);

    info!("Starting Resume Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    if config.api_key().is_none() {
        warn!("GEMINI_API_KEY is not set; analyze requests will fail with a configuration error");
    }

    let model = GeminiClient::new(
        config.gemini_api_base.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    info!("Gemini client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        model: Arc::new(model),
        config: config.clone(),
    };

    // The front-end calls from the browser, so CORS stays open
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
