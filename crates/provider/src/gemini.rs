//! Google generative API adapter
//!
//! Knows two request encodings and never mixes them: PaLM text models
//! (`text-*`) take a single flat prompt string, Gemini models take
//! structured role-tagged contents.

use crate::*;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const TEXT_API_BASE: &str = "https://generativeai.googleapis.com/v1";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1";

/// Google Gemini / PaLM provider
pub struct GeminiProvider {
    client: Client,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// PaLM text models need the flat-prompt encoding
    fn is_text_model(model: &str) -> bool {
        model.contains("text-")
    }

    fn request_url(&self, model: &str) -> String {
        if Self::is_text_model(model) {
            format!("{}/models/{}:generateText?key={}", TEXT_API_BASE, model, self.api_key)
        } else {
            format!(
                "{}/models/{}:generateContent?key={}",
                GEMINI_API_BASE, model, self.api_key
            )
        }
    }

    fn build_request(messages: &[ChatMessage], params: &CompletionParams) -> Value {
        if Self::is_text_model(&params.model) {
            // Flatten the conversation into one prompt string
            let prompt_text = messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");

            json!({
                "prompt": { "text": prompt_text },
                "temperature": params.temperature,
                "candidateCount": 1,
                "maxOutputTokens": params.max_output_tokens,
            })
        } else {
            // Role-tagged contents; anything that is not "user" becomes "model"
            let contents: Vec<Value> = messages
                .iter()
                .map(|m| {
                    let role = if m.role == "user" { "user" } else { "model" };
                    json!({
                        "role": role,
                        "parts": [{ "text": m.content }],
                    })
                })
                .collect();

            json!({
                "contents": contents,
                "generationConfig": {
                    "temperature": params.temperature,
                    "maxOutputTokens": params.max_output_tokens,
                },
            })
        }
    }

    /// Pull the candidate text out of a decoded payload. When the payload
    /// has no recognizable candidate, hand back the whole payload so the
    /// caller's parser can attempt recovery.
    fn extract_text(model: &str, payload: &Value) -> String {
        let candidate = payload["candidates"].get(0);

        let text = if Self::is_text_model(model) {
            candidate.and_then(|c| c["output"].as_str().or_else(|| c["content"].as_str()))
        } else {
            candidate.and_then(|c| c["content"]["parts"][0]["text"].as_str())
        };

        match text {
            Some(text) => text.to_string(),
            None => payload.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String> {
        let url = self.request_url(&params.model);
        debug!("calling {}", redact_key(&url, &self.api_key));

        let body = Self::build_request(messages, params);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let payload: Value = response.json().await?;
        let text = Self::extract_text(&params.model, &payload).trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        Ok(text)
    }
}
