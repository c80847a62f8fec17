//! GET / — the static chat page.

use std::sync::Arc;

use axum::{extract::State, response::Html};
use tracing::warn;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    match tokio::fs::read_to_string(&state.index_path).await {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            warn!(path = %state.index_path.display(), error = %e, "chat page not readable");
            Err(AppError::NotFound(format!(
                "{} not found",
                state.index_path.display()
            )))
        }
    }
}
