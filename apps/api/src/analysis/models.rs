//! Request and result types for the analyze endpoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Raw inbound body. Every field is optional so that a missing field is
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePayload {
    pub resume_text: Option<String>,
    #[serde(rename = "type")]
    pub analysis_type: Option<String>,
    pub location: Option<String>,
    pub date_posted: Option<String>,
}

/// The kind of analysis the caller asked for. Selects the system prompt and
/// whether the search tool is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Jobs,
    Critique,
    Contacts,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Jobs => "jobs",
            AnalysisType::Critique => "critique",
            AnalysisType::Contacts => "contacts",
        }
    }

    pub fn uses_search(&self) -> bool {
        matches!(self, AnalysisType::Jobs | AnalysisType::Contacts)
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jobs" => Ok(AnalysisType::Jobs),
            "critique" => Ok(AnalysisType::Critique),
            "contacts" => Ok(AnalysisType::Contacts),
            other => Err(AppError::InvalidType(other.to_string())),
        }
    }
}

/// Optional search filters, already normalized: trimmed, empty values
/// dropped, and a `datePosted` of `"any"` treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub location: Option<String>,
    pub date_posted: Option<String>,
}

impl SearchFilters {
    pub fn new(location: Option<&str>, date_posted: Option<&str>) -> Self {
        Self {
            location: non_empty(location),
            date_posted: non_empty(date_posted).filter(|d| !d.eq_ignore_ascii_case("any")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.date_posted.is_none()
    }
}

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub analysis_type: AnalysisType,
    pub filters: SearchFilters,
}

impl TryFrom<AnalyzePayload> for AnalysisRequest {
    type Error = AppError;

    fn try_from(payload: AnalyzePayload) -> Result<Self, Self::Error> {
        let resume_text = non_empty(payload.resume_text.as_deref()).ok_or_else(|| {
            AppError::Validation("Missing required field: resumeText".to_string())
        })?;

        let analysis_type = non_empty(payload.analysis_type.as_deref())
            .ok_or_else(|| AppError::Validation("Missing required field: type".to_string()))?
            .parse::<AnalysisType>()?;

        Ok(AnalysisRequest {
            resume_text,
            analysis_type,
            filters: SearchFilters::new(
                payload.location.as_deref(),
                payload.date_posted.as_deref(),
            ),
        })
    }
}

/// A single web source the model cited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Simplified response returned to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub sources: Vec<Source>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
