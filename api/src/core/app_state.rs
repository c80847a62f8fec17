use std::path::PathBuf;

use quality_agent::QualityAgent;

/// Chat frontend served at `GET /`, relative to the working directory.
pub const DEFAULT_INDEX_PATH: &str = "templates/index.html";

/// Shared state for all HTTP handlers. Immutable after startup.
pub struct AppState {
    /// Assistant used by `/api/chat`; also the source of the model id.
    pub agent: QualityAgent,
    /// Location of the static chat page.
    pub index_path: PathBuf,
}

impl AppState {
    pub fn new(agent: QualityAgent) -> Self {
        Self {
            agent,
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
        }
    }

    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = path.into();
        self
    }
}
