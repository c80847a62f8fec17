use serde::{Deserialize, Serialize};

/// Request payload for /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// User question; required and non-empty.
    #[serde(default)]
    pub message: Option<String>,
    /// Optional override of the completion token budget.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Response payload for /api/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Raw model answer, or the error description if the upstream call failed.
    pub response: String,
}
