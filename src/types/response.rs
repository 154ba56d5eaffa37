//! Response types

use serde::{Deserialize, Serialize};

/// Non-streaming chat response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub finish_reason: FinishReason,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason the model stopped generating
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    #[default]
    Stop,
    Length,
    ContentFilter,
}

/// Outcome of an analysis request, as returned to the browser extension.
///
/// Serializes to `{"success": bool, "analysis": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub analysis: String,
}

impl AnalysisResult {
    /// Successful analysis carrying `text`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            analysis: text.into(),
        }
    }

    /// Failed request; `text` explains why.
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis: text.into(),
        }
    }
}
