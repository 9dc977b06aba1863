//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All LLM interactions MUST go through the `GenerativeModel` trait.
//!
//! Model: gemini-2.0-flash (hardcoded — do not make configurable to prevent drift)

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

pub mod prompts;
pub mod types;

use types::{
    ApiErrorEnvelope, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    SafetySetting, Tool,
};

/// The model used for every analysis call.
pub const MODEL: &str = "gemini-2.0-flash";

const TEMPERATURE: f32 = 0.7;
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 8192;

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The seam between the request translator and the upstream provider.
///
/// Carried in `AppState` as `Arc<dyn GenerativeModel>`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError>;
}

/// Builds a `generateContent` request with the fixed generation parameters
/// and safety thresholds. The search tool is declared only when requested.
pub fn build_request(
    system_prompt: &str,
    user_text: &str,
    enable_search: bool,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(user_text)],
        system_instruction: Content::system(system_prompt),
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            top_k: TOP_K,
            top_p: TOP_P,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
        safety_settings: SAFETY_CATEGORIES
            .into_iter()
            .map(|category| SafetySetting {
                category,
                threshold: SAFETY_THRESHOLD,
            })
            .collect(),
        tools: if enable_search {
            vec![Tool::google_search()]
        } else {
            Vec::new()
        },
    }
}

/// reqwest-backed Gemini client. One POST per call, no retries.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: upstream_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }
}

/// Pulls `error.message` out of a Google error envelope, falling back to the raw body.
fn upstream_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "Upstream API returned an empty error body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_request_sets_fixed_parameters() {
        let request = build_request("system", "resume", false);
        assert_eq!(request.generation_config.top_k, TOP_K);
        assert_eq!(request.generation_config.max_output_tokens, MAX_OUTPUT_TOKENS);
        assert_eq!(request.safety_settings.len(), 4);
        assert!(request
            .safety_settings
            .iter()
            .all(|s| s.threshold == SAFETY_THRESHOLD));
        assert!(!request.has_search_tool());
    }

    #[test]
    fn test_build_request_with_search() {
        let request = build_request("system", "resume", true);
        assert!(request.has_search_tool());
        assert_eq!(request.tools.len(), 1);
    }

    #[test]
    fn test_upstream_error_message_from_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(upstream_error_message(body), "API key not valid.");
    }

    #[test]
    fn test_upstream_error_message_falls_back_to_raw_body() {
        assert_eq!(upstream_error_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(
            upstream_error_message(""),
            "Upstream API returned an empty error body"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:9999/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(),
            format!("http://localhost:9999{GENERATE_PATH}")
        );
    }

    #[tokio::test]
    async fn test_generate_sends_key_header_and_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "**Strengths**"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = build_request("critique", "Jane Doe", false);
        let response = client_for(&server)
            .generate("test-key", &request)
            .await
            .unwrap();

        assert_eq!(response.text(), Some("**Strengths**"));
    }

    #[tokio::test]
    async fn test_generate_surfaces_provider_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = build_request("jobs", "Jane Doe", true);
        let err = client_for(&server)
            .generate("bad-key", &request)
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Permission denied");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let request = build_request("contacts", "Jane Doe", true);
        let result = client_for(&server).generate("key", &request).await;

        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
        // MockServer verifies `.expect(1)` on drop
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let request = build_request("critique", "Jane Doe", false);
        let result = client_for(&server).generate("key", &request).await;

        assert!(matches!(result, Err(LlmError::Parse(_))));
    }
}
