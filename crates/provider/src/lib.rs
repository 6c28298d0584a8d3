//! Model provider adapters
//!
//! Translates a role-tagged message list into a single text completion
//! against one concrete provider endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod gemini;
pub mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Longest provider error body we will carry in an error value
pub const MAX_ERROR_BODY: usize = 200;

/// Outbound request timeout. A dropped caller cancels the in-flight
/// request; this bound keeps a stuck provider from pinning a run forever.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Provider adapter errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("empty completion from provider")]
    EmptyCompletion,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// One entry of the conversation sent to a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Generation parameters for one completion call
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_output_tokens: 256,
            temperature: 0.2,
        }
    }
}

/// A concrete provider integration. Implementations must return plain
/// trimmed text and must never embed the credential in errors or logs.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[ChatMessage], params: &CompletionParams)
        -> Result<String>;
}

/// Bound an error body before embedding it in a `ProviderError`
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body[..end].to_string()
    }
}

/// Strip a `key=` query value so URLs are safe to log
pub(crate) fn redact_key(url: &str, api_key: &str) -> String {
    url.replace(api_key, "***KEY***")
}
