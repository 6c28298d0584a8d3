//! Tool capability contract and registry

pub mod summarize;
pub mod web_search;

pub use summarize::SummarizeTool;
pub use web_search::WebSearchTool;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

type BoxedTool = Box<dyn Tool + Send + Sync>;
type ToolError = Box<dyn std::error::Error + Send + Sync>;

/// A named capability the planner can choose. Failures must carry a
/// human-readable message; they are fed back to the model as observations.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn invoke(&self, input: &str) -> Result<ToolOutput, ToolError>;
}

/// What a tool hands back to the loop
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Json(Value),
}

impl ToolOutput {
    /// Deterministic readable form for the observation text
    pub fn render(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        ToolOutput::Text(text)
    }
}

impl From<&str> for ToolOutput {
    fn from(text: &str) -> Self {
        ToolOutput::Text(text.to_string())
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        ToolOutput::Json(value)
    }
}

/// Name-keyed tool collection, built once at agent construction and
/// read-only afterwards. Insertion order is preserved so the catalog is
/// stable across calls. Re-registering a name replaces the tool in place;
/// the last registration wins and no error is raised.
#[derive(Default)]
pub struct ToolRegistry {
    order: Vec<String>,
    tools: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&(dyn Tool + Send + Sync)> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// One "name: description" line per tool, in registration order
    pub fn describe_all(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FakeTool {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait]
    impl Tool for FakeTool {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            self.description
        }
        async fn invoke(&self, input: &str) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::Text(format!("{}:{}", self.name, input)))
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(FakeTool {
            name: "alpha",
            description: "first tool",
        });

        assert!(registry.has("alpha"));
        assert!(!registry.has("beta"));
        assert_eq!(registry.get("alpha").unwrap().name(), "alpha");
        assert!(registry.get("beta").is_none());
    }

    #[test]
    fn test_describe_all_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(FakeTool {
            name: "zeta",
            description: "last alphabetically",
        });
        registry.register(FakeTool {
            name: "alpha",
            description: "first alphabetically",
        });

        let catalog = registry.describe_all();
        assert_eq!(
            catalog,
            vec![
                "zeta: last alphabetically".to_string(),
                "alpha: first alphabetically".to_string(),
            ]
        );
        // stable across repeated calls
        assert_eq!(registry.describe_all(), catalog);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(FakeTool {
            name: "alpha",
            description: "old",
        });
        registry.register(FakeTool {
            name: "beta",
            description: "second",
        });
        registry.register(FakeTool {
            name: "alpha",
            description: "new",
        });

        assert_eq!(registry.names(), vec!["alpha", "beta"]);
        assert_eq!(
            registry.describe_all(),
            vec!["alpha: new".to_string(), "beta: second".to_string()]
        );
    }

    #[test]
    fn test_tool_output_render() {
        assert_eq!(ToolOutput::from("plain").render(), "plain");

        let rendered = ToolOutput::from(json!({"b": 2, "a": 1})).render();
        // pretty-printed with stable key order
        assert_eq!(rendered, "{\n  \"a\": 1,\n  \"b\": 2\n}");
    }
}
