/// Configuration for chat-completion calls against OpenRouter.
///
/// Built once at startup (see [`crate::config::default_config`]) and never
/// mutated afterwards. Cloned into whichever component needs it.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "openai/gpt-3.5-turbo".to_string(),
///     endpoint: "https://openrouter.ai/api/v1".to_string(),
///     api_key: "sk-or-...".to_string(),
///     max_tokens: 300,
///     temperature: 0.2,
///     timeout_secs: 30,
///     referer: None,
///     title: Some("ISO 9001 Assistant".to_string()),
/// };
/// assert_eq!(cfg.max_tokens, 300);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string (e.g., `"openai/gpt-3.5-turbo"`).
    pub model: String,

    /// API base URL; `/chat/completions` is appended to it.
    pub endpoint: String,

    /// Secret bearer token.
    pub api_key: String,

    /// Default token budget for a completion; callers may override per request.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Optional `HTTP-Referer` attribution header.
    pub referer: Option<String>,

    /// Optional `X-Title` attribution header.
    pub title: Option<String>,
}
