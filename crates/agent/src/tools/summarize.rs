//! Summarize tool, backed by a model provider

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{Tool, ToolOutput};
use mapra_provider::{ChatMessage, CompletionParams, ModelProvider};

/// Condense text into a handful of bullet points
pub struct SummarizeTool {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

impl SummarizeTool {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Tool for SummarizeTool {
    fn name(&self) -> &str {
        "summarize"
    }

    fn description(&self) -> &str {
        "Summarize the given text into 3-6 bullets"
    }

    async fn invoke(
        &self,
        input: &str,
    ) -> Result<ToolOutput, Box<dyn std::error::Error + Send + Sync>> {
        let text = input.trim();
        if text.is_empty() {
            return Ok("No text provided to summarize.".into());
        }

        debug!("summarizing {} chars via {}", text.len(), self.provider.name());

        let prompt = format!(
            "Summarize the text below into 5 concise bullet points:\n\n{}\n\nBullets:",
            text
        );
        let params = CompletionParams {
            model: self.model.clone(),
            max_output_tokens: 400,
            temperature: 0.1,
        };

        let summary = self
            .provider
            .complete(&[ChatMessage::user(prompt)], &params)
            .await?;
        Ok(summary.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapra_provider::{ProviderError, Result as ProviderResult};

    struct CannedProvider;

    #[async_trait]
    impl ModelProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }
        async fn complete(
            &self,
            messages: &[ChatMessage],
            params: &CompletionParams,
        ) -> ProviderResult<String> {
            assert_eq!(params.model, "gemini-pro");
            assert_eq!(params.max_output_tokens, 400);
            assert!(messages[0].content.starts_with("Summarize the text below"));
            Ok("- bullet one\n- bullet two".to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ModelProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _params: &CompletionParams,
        ) -> ProviderResult<String> {
            Err(ProviderError::EmptyCompletion)
        }
    }

    #[tokio::test]
    async fn test_summarize_delegates_to_provider() {
        let tool = SummarizeTool::new(Arc::new(CannedProvider), "gemini-pro");
        let out = tool.invoke("a long article body").await.unwrap();
        assert_eq!(out.render(), "- bullet one\n- bullet two");
    }

    #[tokio::test]
    async fn test_summarize_empty_input_is_output() {
        let tool = SummarizeTool::new(Arc::new(CannedProvider), "gemini-pro");
        let out = tool.invoke("").await.unwrap();
        assert_eq!(out.render(), "No text provided to summarize.");
    }

    #[tokio::test]
    async fn test_summarize_propagates_provider_failure() {
        let tool = SummarizeTool::new(Arc::new(FailingProvider), "gemini-pro");
        let err = tool.invoke("some text").await.unwrap_err();
        assert!(err.to_string().contains("empty completion"));
    }
}
