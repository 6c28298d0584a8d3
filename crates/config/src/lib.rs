//! Configuration management for MAPRA
//!
//! Loads and saves agent settings, provider credentials, and tool keys
//! from a JSON file under `~/.mapra`, with environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{config_path, data_dir};

/// Errors in configuration handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("max_cycles must be at least 1")]
    InvalidMaxCycles,

    #[error("invalid {0} value: {1}")]
    InvalidEnvValue(&'static str, String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Agent identity and cycle budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default = "default_agent_description")]
    pub description: String,
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            description: default_agent_description(),
            max_cycles: default_max_cycles(),
        }
    }
}

fn default_agent_name() -> String {
    "mapra".to_string()
}

fn default_agent_description() -> String {
    "Multi-step research assistant (single-agent prototype).".to_string()
}

fn default_max_cycles() -> u32 {
    4
}

/// Credentials and model id for one provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
}

/// All configured providers. Gemini is the primary, OpenAI the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_gemini")]
    pub gemini: ProviderConfig,
    #[serde(default = "default_openai")]
    pub openai: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            gemini: default_gemini(),
            openai: default_openai(),
        }
    }
}

fn default_gemini() -> ProviderConfig {
    ProviderConfig {
        api_key: String::new(),
        model: "gemini-pro".to_string(),
    }
}

fn default_openai() -> ProviderConfig {
    ProviderConfig {
        api_key: String::new(),
        model: "gpt-3.5-turbo".to_string(),
    }
}

/// Web search tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: String,
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolsConfig {
    #[serde(default)]
    pub search: SearchConfig,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    /// Load from the default location with environment overrides applied
    pub async fn load() -> Result<Self> {
        let path = config_path();
        let mut config = Self::load_from(&path).await?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a specific file, without environment overrides
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no config found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("loading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to a specific file
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        debug!("writing config to {:?}", path);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Overlay well-known environment variables on top of file values
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.providers.gemini.api_key = key;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.providers.gemini.model = model;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.providers.openai.api_key = key;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.providers.openai.model = model;
        }
        if let Ok(key) = std::env::var("SERP_API_KEY") {
            self.tools.search.api_key = key;
        }
        if let Ok(raw) = std::env::var("MAPRA_MAX_CYCLES") {
            self.agent.max_cycles = raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnvValue("MAPRA_MAX_CYCLES", raw))?;
        }
        Ok(())
    }

    /// Reject configurations that cannot drive the agent loop.
    /// A zero cycle budget is a startup error, not a silent default.
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_cycles == 0 {
            return Err(ConfigError::InvalidMaxCycles);
        }
        Ok(())
    }

    /// Primary provider key, if configured
    pub fn gemini_api_key(&self) -> Option<String> {
        non_empty(&self.providers.gemini.api_key)
    }

    /// Fallback provider key, if configured
    pub fn openai_api_key(&self) -> Option<String> {
        non_empty(&self.providers.openai.api_key)
    }

    /// Web search key, if configured
    pub fn serp_api_key(&self) -> Option<String> {
        non_empty(&self.tools.search.api_key)
    }

    /// True when at least one provider credential is available
    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key().is_some() || self.openai_api_key().is_some()
    }

    /// Primary model id, defaulted when the file names only a key
    pub fn gemini_model(&self) -> String {
        non_empty(&self.providers.gemini.model).unwrap_or_else(|| "gemini-pro".to_string())
    }

    /// Fallback model id, defaulted when the file names only a key
    pub fn openai_model(&self) -> String {
        non_empty(&self.providers.openai.model).unwrap_or_else(|| "gpt-3.5-turbo".to_string())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Initialize the config file and data directory
pub async fn init() -> Result<Config> {
    let config_path = config_path();

    if config_path.exists() {
        warn!("config already exists at {:?}", config_path);
    } else {
        let config = Config::default();
        config.save().await?;
        info!("config created at {:?}", config_path);
    }

    Config::load().await
}
