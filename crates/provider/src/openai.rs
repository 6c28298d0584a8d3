//! OpenAI chat completions adapter

use crate::*;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI provider, used as the fallback tier
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    api_base: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base(api_key, API_BASE)
    }

    pub fn with_base(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            api_base: api_base.into(),
        }
    }

    fn build_request(messages: &[ChatMessage], params: &CompletionParams) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        json!({
            "model": params.model,
            "messages": messages,
            "max_tokens": params.max_output_tokens,
            "temperature": params.temperature,
        })
    }

    fn extract_text(payload: &Value) -> String {
        match payload["choices"][0]["message"]["content"].as_str() {
            Some(text) => text.to_string(),
            // unrecognizable shape: hand the payload to the caller's parser
            None => payload.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ModelProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);
        debug!("calling {}", url);

        let body = Self::build_request(messages, params);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
        let text = Self::extract_text(&payload).trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        Ok(text)
    }
}
