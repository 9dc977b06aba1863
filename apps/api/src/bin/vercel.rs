//! Vercel function adapter for the analyze endpoint.
//!
//! Configuration is read on every invocation so the credential reflects the
//! function's current environment.

use std::sync::OnceLock;
use std::time::Duration;

use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};

use resume_analyzer::analysis::models::AnalysisResult;
use resume_analyzer::analysis::translator::{analyze, require_post};
use resume_analyzer::config::Config;
use resume_analyzer::errors::AppError;
use resume_analyzer::llm_client::{GeminiClient, GenerativeModel};

/// Used until the environment has been read; `RUST_LOG` still wins when set.
const DEFAULT_LOG_LEVEL: &str = "info";

static TRACING: OnceLock<()> = OnceLock::new();

#[tokio::main]
async fn main() -> Result<(), Error> {
    run(handler).await
}

pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    // Before config, so a config failure is still logged
    ensure_tracing();

    let outcome = match load() {
        Ok((config, model)) => {
            handle(
                &model,
                config.api_key(),
                req.method().as_str(),
                req.body().as_ref(),
            )
            .await
        }
        Err(err) => Err(err),
    };

    respond(outcome)
}

/// Installs the subscriber once per process; warm invocations reuse it.
fn ensure_tracing() {
    TRACING.get_or_init(|| resume_analyzer::init_tracing(DEFAULT_LOG_LEVEL));
}

fn load() -> Result<(Config, GeminiClient), AppError> {
    let config = Config::from_env()?;
    let model = GeminiClient::new(
        config.gemini_api_base.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    Ok((config, model))
}

async fn handle(
    model: &dyn GenerativeModel,
    api_key: Option<&str>,
    method: &str,
    body: &[u8],
) -> Result<AnalysisResult, AppError> {
    require_post(method)?;
    analyze(model, api_key, body).await
}

/// Maps the outcome to a JSON response: `{text, sources}` or `{error}`.
fn respond(outcome: Result<AnalysisResult, AppError>) -> Result<Response<Body>, Error> {
    let (status, body) = match outcome {
        Ok(result) => (StatusCode::OK, serde_json::to_value(result)?),
        Err(err) => {
            let (status, body) = err.into_parts();
            (StatusCode::from_u16(status.as_u16())?, body)
        }
    };

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(body.to_string()))?)
}
