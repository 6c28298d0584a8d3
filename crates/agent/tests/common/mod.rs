//! Shared test doubles for the agent loop tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use mapra_agent::{Agent, AgentIdentity, Planner, ProviderSlot, Tool, ToolOutput, ToolRegistry};
use mapra_provider::{ChatMessage, CompletionParams, ModelProvider, ProviderError};

/// A provider that replays a fixed script of responses and records every
/// prompt it was asked
pub struct ScriptedProvider {
    name: &'static str,
    script: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(name: &'static str, script: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// The user-message content of every call made so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> mapra_provider::Result<String> {
        let prompt = messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ProviderError::Api {
                status: 500,
                body: message,
            }),
            None => Err(ProviderError::EmptyCompletion),
        }
    }
}

/// A tool that always fails with a fixed message
pub struct FailingTool {
    pub name: &'static str,
    pub message: &'static str,
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "always fails"
    }
    async fn invoke(
        &self,
        _input: &str,
    ) -> Result<ToolOutput, Box<dyn std::error::Error + Send + Sync>> {
        Err(self.message.into())
    }
}

/// A tool that echoes its input back, optionally as a JSON value
pub struct EchoTool {
    pub name: &'static str,
    pub as_json: bool,
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "echoes input"
    }
    async fn invoke(
        &self,
        input: &str,
    ) -> Result<ToolOutput, Box<dyn std::error::Error + Send + Sync>> {
        if self.as_json {
            Ok(serde_json::json!({ "echo": input }).into())
        } else {
            Ok(format!("echo: {}", input).into())
        }
    }
}

pub fn identity(max_cycles: u32) -> AgentIdentity {
    AgentIdentity {
        name: "mapra".to_string(),
        description: "test agent".to_string(),
        max_cycles,
    }
}

/// An agent over a single scripted provider
pub fn scripted_agent(
    max_cycles: u32,
    script: Vec<Result<String, String>>,
    tools: ToolRegistry,
) -> (Agent, Arc<ScriptedProvider>) {
    let provider = ScriptedProvider::new("scripted", script);
    let planner = Planner::new(vec![ProviderSlot::new(provider.clone(), "test-model")]);
    (Agent::new(identity(max_cycles), planner, tools), provider)
}

pub fn plan_json(action: &str, input: &str) -> String {
    format!(r#"{{"action":"{}","action_input":"{}"}}"#, action, input)
}
