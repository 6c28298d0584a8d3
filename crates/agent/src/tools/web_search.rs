//! Web search tool backed by SerpAPI

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{Tool, ToolOutput};

const API_BASE: &str = "https://serpapi.com/search.json";
const MAX_SNIPPETS: usize = 3;

/// Search the web and return short snippets
pub struct WebSearchTool {
    client: Client,
    api_key: Option<String>,
    api_base: String,
}

impl WebSearchTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base(api_key, API_BASE)
    }

    pub fn with_base(api_key: Option<String>, api_base: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key,
            api_base: api_base.into(),
        }
    }

    fn format_results(data: &Value, query: &str) -> String {
        if let Some(results) = data["organic_results"].as_array() {
            if !results.is_empty() {
                return results
                    .iter()
                    .take(MAX_SNIPPETS)
                    .map(|r| {
                        let title = r["title"].as_str().unwrap_or("");
                        let snippet = r["snippet"]
                            .as_str()
                            .or_else(|| r["link"].as_str())
                            .unwrap_or("");
                        format!("{}\n{}", title, snippet)
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n");
            }
        }
        if let Some(error) = data["error"].as_str() {
            return format!("Search error: {}", error);
        }
        format!("No search results found for: {}", query)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web and return short snippets"
    }

    async fn invoke(
        &self,
        input: &str,
    ) -> Result<ToolOutput, Box<dyn std::error::Error + Send + Sync>> {
        let query = input.trim();
        if query.is_empty() {
            return Ok("No query provided to web_search.".into());
        }

        // A missing key is routine, not an error: report it as output so
        // the planner can route around the disabled tool.
        let Some(api_key) = &self.api_key else {
            return Ok("Error: SERP_API_KEY not set. Web search is disabled.".into());
        };

        debug!("web search: {}", query);

        let response = self
            .client
            .get(&self.api_base)
            .query(&[("q", query), ("api_key", api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Search API request failed: {}", status).into());
        }

        let data: Value = response.json().await?;
        Ok(Self::format_results(&data, query).into())
    }
}
