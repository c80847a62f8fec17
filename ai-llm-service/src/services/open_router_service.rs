//! OpenRouter service for chat completions.
//!
//! Minimal, non-streaming client around the OpenAI-compatible REST API that
//! OpenRouter exposes:
//! - POST {endpoint}/chat/completions — chat completion
//!
//! Constructor validation:
//! - `cfg.api_key` must be non-empty
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Every call is a single attempt. There are no retries and no backoff.
//! [`OpenRouterService::generate`] reports failures as [`AiLlmError`];
//! [`OpenRouterService::answer`] folds them into a descriptive string.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, HttpError, ProviderError, error_detail, make_snippet,
        validate_http_endpoint,
    },
};

/// Prefix of every answer produced from a failed call.
pub const ERROR_PREFIX: &str = "Error: ";

/// Whether `answer` was produced from a failure rather than by the model.
pub fn is_error_answer(answer: &str) -> bool {
    answer.starts_with(ERROR_PREFIX)
}

/// Thin client for the OpenRouter chat-completion API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct OpenRouterService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl OpenRouterService {
    /// Creates a new [`OpenRouterService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] if `cfg.api_key` is blank
    /// - [`ConfigError::InvalidFormat`] if `cfg.endpoint` is not http(s)
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("OPENROUTER_API_KEY").into());
        }

        let endpoint = cfg.endpoint.trim();
        validate_http_endpoint("endpoint", endpoint)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key)).map_err(|_| {
                ConfigError::InvalidFormat {
                    var: "OPENROUTER_API_KEY",
                    reason: "not a valid header value",
                }
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(referer) = cfg.referer.as_deref() {
            if let Ok(v) = header::HeaderValue::from_str(referer) {
                headers.insert("HTTP-Referer", v);
            }
        }
        if let Some(title) = cfg.title.as_deref() {
            if let Ok(v) = header::HeaderValue::from_str(title) {
                headers.insert("X-Title", v);
            }
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let url_chat = format!("{}/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs,
            max_tokens = cfg.max_tokens,
            "OpenRouterService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// The config this service was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Performs one **non-streaming** chat completion request.
    ///
    /// `messages` is `[system?, user]`. `max_tokens` overrides the configured
    /// budget for this call only.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for network failures and timeouts
    /// - [`ProviderError::Decode`] if the JSON cannot be parsed
    /// - [`ProviderError::EmptyChoices`] if no content is returned
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        max_tokens: Option<u32>,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt, system, max_tokens);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            max_tokens = body.max_tokens,
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let detail = error_detail(&text);

            error!(
                %status,
                %url,
                snippet = %make_snippet(&text),
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(ProviderError::HttpStatus(HttpError {
                status,
                url,
                detail,
            })
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completion response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                ))
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ProviderError::EmptyChoices)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );

        Ok(content.trim().to_string())
    }

    /// Like [`generate`](Self::generate), but never fails.
    ///
    /// Any error becomes a human-readable string starting with
    /// [`ERROR_PREFIX`], returned in place of the answer.
    pub async fn answer(&self, prompt: &str, system: Option<&str>, max_tokens: Option<u32>) -> String {
        match self.generate(prompt, system, max_tokens).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "returning error text in place of an answer");
                format!("{ERROR_PREFIX}{e}")
            }
        }
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(
        cfg: &'a LlmModelConfig,
        prompt: &'a str,
        system: Option<&'a str>,
        max_tokens: Option<u32>,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            max_tokens: max_tokens.unwrap_or(cfg.max_tokens),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}
