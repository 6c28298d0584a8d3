//! Planner: prompt construction and provider fallback
//!
//! Providers are held as an explicit ordered list; the first slot is the
//! preferred provider and each later slot is only tried after the one
//! before it fails. A failure of the last slot is never swallowed.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use mapra_provider::{ChatMessage, CompletionParams, ModelProvider};

use crate::loop_agent::AgentIdentity;
use crate::plan::{parse_plan, Plan, PlanParseError};

const SYSTEM_PROMPT: &str = "You are a JSON-outputting planner";
const PLAN_MAX_TOKENS: u32 = 600;
const PLAN_TEMPERATURE: f32 = 0.2;

/// Planning failures. All of these are fatal to the run that hits them.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("No LLM API key configured (set GEMINI_API_KEY or OPENAI_API_KEY)")]
    NoProviderConfigured,

    #[error("provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error(transparent)]
    Parse(#[from] PlanParseError),
}

/// One configured provider plus the model id to use with it
pub struct ProviderSlot {
    pub provider: Arc<dyn ModelProvider>,
    pub model: String,
}

impl ProviderSlot {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

/// Builds planning prompts and runs them through the provider chain
pub struct Planner {
    slots: Vec<ProviderSlot>,
}

impl Planner {
    pub fn new(slots: Vec<ProviderSlot>) -> Self {
        Self { slots }
    }

    pub fn has_provider(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Assemble the planning prompt from identity, tool catalog, user
    /// input, and running memory
    pub fn build_prompt(
        identity: &AgentIdentity,
        catalog: &[String],
        user_input: &str,
        memory: &str,
    ) -> String {
        let tool_list = catalog.join("\n");

        format!(
            r#"You are an autonomous agent named "{name}".
Description: {description}

TOOLS AVAILABLE:
{tool_list}

CONSTRAINTS:
- When you want to use a tool, respond with a single JSON object describing the action.
- The JSON must be valid and the "action" field must be one of the tool names or "FINAL_ANSWER".
- If using a tool, include "action_input" with the tool input.
- If you're finished, respond with {{"action":"FINAL_ANSWER","action_input":"<final answer text>"}}.

USER QUESTION:
{user_input}

MEMORY:
{memory}

Respond with a single JSON object (no surrounding text). Example:
{{"action":"web_search","action_input":"latest papers on agentic AI 2024"}}"#,
            name = identity.name,
            description = identity.description,
        )
    }

    /// One planning round: prompt, provider chain, plan extraction
    pub async fn plan_once(
        &self,
        identity: &AgentIdentity,
        catalog: &[String],
        user_input: &str,
        memory: &str,
    ) -> Result<Plan, PlanError> {
        if self.slots.is_empty() {
            return Err(PlanError::NoProviderConfigured);
        }

        let prompt = Self::build_prompt(identity, catalog, user_input, memory);
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        let mut last_failure: Option<PlanError> = None;
        for slot in &self.slots {
            let params = CompletionParams {
                model: slot.model.clone(),
                max_output_tokens: PLAN_MAX_TOKENS,
                temperature: PLAN_TEMPERATURE,
            };

            match slot.provider.complete(&messages, &params).await {
                Ok(text) => {
                    debug!("provider {} answered, extracting plan", slot.provider.name());
                    // parse failures are not retried on the next slot;
                    // fallback only covers adapter failures
                    return Ok(parse_plan(&text)?);
                }
                Err(e) => {
                    warn!("provider {} failed: {}", slot.provider.name(), e);
                    last_failure = Some(PlanError::Provider {
                        provider: slot.provider.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        // slots is non-empty, so at least one failure was recorded
        Err(last_failure.expect("provider chain exhausted without a recorded failure"))
    }
}
