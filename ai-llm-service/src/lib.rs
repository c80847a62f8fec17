//! OpenRouter chat-completion gateway.
//!
//! - [`config`] — immutable model config and env-driven defaults
//! - [`services::open_router_service`] — single-attempt, non-streaming client
//! - [`error_handler`] — unified error type for the crate

pub mod config;
pub mod error_handler;
pub mod services;

pub use config::default_config::{config_openrouter, config_openrouter_from};
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ConfigError, ProviderError};
pub use services::open_router_service::{ERROR_PREFIX, OpenRouterService, is_error_answer};
