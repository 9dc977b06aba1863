//! Axum route handler for the Analysis API.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    Json,
};

use crate::analysis::models::AnalysisResult;
use crate::analysis::translator::{analyze, require_post};
use crate::errors::AppError;
use crate::state::AppState;

/// Upper bound on the inbound body. Applied by the router as `DefaultBodyLimit`.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// ANY /api/analyze
///
/// Mounted for every method so that non-POST calls get the JSON error body
/// instead of Axum's empty 405. The body is taken raw, and body rejections
/// (oversized or unreadable) are reported in the same `{"error": ...}` shape.
pub async fn handle_analyze(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    require_post(method.as_str())?;

    let body = body.map_err(body_rejection)?;

    let result = analyze(state.model.as_ref(), state.config.api_key(), &body).await?;

    Ok(Json(result))
}

fn body_rejection(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("limit is {MAX_BODY_BYTES} bytes"))
    } else {
        AppError::Validation(format!("Unreadable request body: {}", rejection.body_text()))
    }
}
