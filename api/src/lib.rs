use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::AppError;

use crate::routes::{chat::chat_route::chat, health_route::health, index_route::index};

/// Default bind address when `API_ADDRESS` is unset.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:5000";

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl+C.
pub async fn start(state: AppState, addr: &str) -> Result<(), AppError> {
    if !state.index_path.exists() {
        warn!(path = %state.index_path.display(), "chat page not found; GET / will answer 404");
    }

    let model = state.agent.model().to_string();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;

    info!(%addr, %model, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
