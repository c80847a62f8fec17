//! POST /api/chat — forwards one message to the model, returns the raw answer.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

pub const NO_MESSAGE: &str = "No message provided";

/// Handler: POST /api/chat
///
/// Upstream failures still answer 200; `response` then carries the
/// `Error: ...` text.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"What is clause 8.5.1?","max_tokens":300}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;

    let message = body
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::BadRequest(NO_MESSAGE.into()))?;

    info!(
        message_len = message.len(),
        max_tokens = ?body.max_tokens,
        "chat request"
    );

    let response = state.agent.ask_raw(&message, body.max_tokens).await;

    Ok(Json(ChatResponse { response }))
}
