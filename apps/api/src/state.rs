use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; every request is handled independently.
#[derive(Clone)]
pub struct AppState {
    /// Upstream model. Default: `GeminiClient`. Tests swap in a stub.
    pub model: Arc<dyn GenerativeModel>,
    pub config: Config,
}
