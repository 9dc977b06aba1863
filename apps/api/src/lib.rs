//! Resume Analyzer API: forwards resume text to Gemini with a per-analysis
//! system prompt and returns `{text, sources}` to the front-end.
//!
//! The analysis logic is platform-neutral; `routes` mounts it on Axum and
//! `src/bin/vercel.rs` mounts it as a Vercel function.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod routes;
pub mod state;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes structured logging. `RUST_LOG` wins when set; otherwise the
/// crate's own targets log at `default_level`.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "resume_analyzer={default_level},api={default_level},vercel_analyze={default_level},tower_http={default_level}"
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
