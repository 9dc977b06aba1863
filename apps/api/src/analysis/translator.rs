//! Request Translator — turns an inbound analyze call into one Gemini call
//! and reshapes the answer into `{text, sources}`.
//!
//! Platform adapters (the Axum route, the Vercel function) own the transport;
//! everything from method check to response extraction lives here.

use tracing::{info, warn};

use crate::analysis::models::{AnalysisRequest, AnalysisResult, AnalyzePayload, Source};
use crate::analysis::prompts::build_system_prompt;
use crate::errors::AppError;
use crate::llm_client::types::{GenerateContentResponse, GroundingChunk};
use crate::llm_client::{build_request, GenerativeModel};

/// Returned as `text` when the model produced no text part.
pub const NO_RESPONSE_TEXT: &str = "No response text found.";

/// Rejects anything but POST.
pub fn require_post(method: &str) -> Result<(), AppError> {
    if method.eq_ignore_ascii_case("POST") {
        Ok(())
    } else {
        Err(AppError::MethodNotAllowed)
    }
}

/// Parses the raw body into a validated request.
pub fn parse_request(body: &[u8]) -> Result<AnalysisRequest, AppError> {
    let payload: AnalyzePayload = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
    AnalysisRequest::try_from(payload)
}

/// Runs a full analysis.
///
/// The credential is checked before the body, so a missing key is reported
/// regardless of what the caller sent. Unknown types fail before any
/// upstream call is made.
pub async fn analyze(
    model: &dyn GenerativeModel,
    api_key: Option<&str>,
    body: &[u8],
) -> Result<AnalysisResult, AppError> {
    let api_key = api_key.ok_or_else(|| {
        AppError::Configuration("Server is missing the GEMINI_API_KEY configuration".to_string())
    })?;

    let request = parse_request(body)?;
    run(model, api_key, &request).await
}

/// Issues the upstream call for an already-validated request.
pub async fn run(
    model: &dyn GenerativeModel,
    api_key: &str,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AppError> {
    let system_prompt = build_system_prompt(request.analysis_type, &request.filters);
    let upstream_request = build_request(
        &system_prompt,
        &request.resume_text,
        request.analysis_type.uses_search(),
    );

    let response = model.generate(api_key, &upstream_request).await?;
    let result = extract_result(&response);

    info!(
        analysis_type = %request.analysis_type,
        sources = result.sources.len(),
        "Analysis completed"
    );

    Ok(result)
}

/// Reads text from the first candidate's first part and collects valid
/// grounding sources. Never fails: missing text degrades to a placeholder.
pub fn extract_result(response: &GenerateContentResponse) -> AnalysisResult {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        warn!("Prompt was blocked by the provider: {reason}");
    }

    let candidate = response.first_candidate();
    if let Some(reason) = candidate
        .and_then(|c| c.finish_reason.as_deref())
        .filter(|r| *r != "STOP")
    {
        warn!("Candidate finished early: {reason}");
    }

    let text = response
        .text()
        .map(str::to_string)
        .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string());

    let sources: Vec<Source> = candidate
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|m| {
            m.grounding_chunks
                .iter()
                .chain(m.grounding_attributions.iter())
                .filter_map(to_source)
                .collect()
        })
        .unwrap_or_default();

    AnalysisResult { text, sources }
}

/// Keeps a chunk only when both `uri` and `title` are present and non-empty.
fn to_source(chunk: &GroundingChunk) -> Option<Source> {
    let web = chunk.web.as_ref()?;
    let uri = web.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
    let title = web.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    Some(Source {
        uri: uri.to_string(),
        title: title.to_string(),
    })
}
