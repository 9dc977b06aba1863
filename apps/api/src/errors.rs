use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::Level;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Non-Axum adapters use `into_parts` to get the same status and body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Invalid analysis type: {0}")]
    InvalidType(String),

    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidType(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }

    /// `warn` for client-side failures, `error` for anything answered with a 5xx.
    pub fn log_level(&self) -> Level {
        if self.status().is_server_error() {
            Level::ERROR
        } else {
            Level::WARN
        }
    }

    /// Logs the error and converts it into a status plus `{"error": ...}` body.
    pub fn into_parts(self) -> (StatusCode, Value) {
        let status = self.status();
        let code = status.as_u16();

        match &self {
            AppError::Internal(e) => tracing::error!(status = code, "Internal error: {e:?}"),
            AppError::Upstream {
                status: upstream_status,
                message,
            } => {
                if self.log_level() == Level::ERROR {
                    tracing::error!(status = code, ?upstream_status, "Upstream API error: {message}");
                } else {
                    tracing::warn!(status = code, ?upstream_status, "Upstream API error: {message}");
                }
            }
            AppError::Configuration(msg) => {
                tracing::error!(status = code, "Configuration error: {msg}")
            }
            other => tracing::warn!(status = code, "Request rejected: {other}"),
        }

        let message = match &self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        (status, json!({ "error": message }))
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, message } => AppError::Upstream {
                status: Some(status),
                message,
            },
            other => AppError::Upstream {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_parts();
        (status, Json(body)).into_response()
    }
}
