//! Command implementations: wiring config to providers, tools, and the agent

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use mapra_agent::tools::{SummarizeTool, WebSearchTool};
use mapra_agent::{Agent, AgentIdentity, Planner, ProviderSlot, ToolRegistry};
use mapra_config::Config;
use mapra_provider::{GeminiProvider, ModelProvider, OpenAiProvider};

async fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(&path).await?,
        None => Config::load_from(&mapra_config::config_path()).await?,
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// Build the agent from config: provider slots in preference order
/// (Gemini primary, OpenAI fallback), then the tool registry.
fn build_agent(config: &Config) -> Agent {
    let mut slots: Vec<ProviderSlot> = Vec::new();
    let mut summarizer: Option<(Arc<dyn ModelProvider>, String)> = None;

    if let Some(key) = config.gemini_api_key() {
        let provider: Arc<dyn ModelProvider> = Arc::new(GeminiProvider::new(key));
        summarizer = Some((provider.clone(), config.gemini_model()));
        slots.push(ProviderSlot::new(provider, config.gemini_model()));
    }

    if let Some(key) = config.openai_api_key() {
        let provider: Arc<dyn ModelProvider> = Arc::new(OpenAiProvider::new(key));
        if summarizer.is_none() {
            summarizer = Some((provider.clone(), config.openai_model()));
        }
        slots.push(ProviderSlot::new(provider, config.openai_model()));
    }

    let mut tools = ToolRegistry::new();
    tools.register(WebSearchTool::new(config.serp_api_key()));
    if let Some((provider, model)) = summarizer {
        tools.register(SummarizeTool::new(provider, model));
    }

    let identity = AgentIdentity {
        name: config.agent.name.clone(),
        description: config.agent.description.clone(),
        max_cycles: config.agent.max_cycles,
    };

    Agent::new(identity, Planner::new(slots), tools)
}

/// `mapra init` - write the default config if absent
pub async fn init_command(config_path: Option<PathBuf>) -> Result<()> {
    match config_path {
        Some(path) => {
            if path.exists() {
                println!("Config already exists at {}", path.display());
            } else {
                Config::default()
                    .save_to(&path)
                    .await
                    .context("failed to write config")?;
                println!("Config created at {}", path.display());
            }
        }
        None => {
            mapra_config::init().await.context("failed to init config")?;
            println!(
                "Config ready at {}",
                mapra_config::config_path().display()
            );
        }
    }
    Ok(())
}

/// `mapra ask` - the request/response boundary: one query in, one
/// RunOutcome JSON out. An empty query is a client error and never
/// reaches the agent loop.
pub async fn ask_command(query: &str, memory: &str, config_path: Option<PathBuf>) -> Result<()> {
    if query.trim().is_empty() {
        bail!("provide a non-empty query");
    }

    let config = load_config(config_path).await?;
    let agent = build_agent(&config);

    let outcome = agent.run(query, memory).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// `mapra status` - configuration summary, credentials shown only as
/// present or absent
pub async fn status_command(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path).await?;

    println!("agent:      {}", config.agent.name);
    println!("max cycles: {}", config.agent.max_cycles);
    println!(
        "gemini:     {} (model {})",
        configured(config.gemini_api_key().is_some()),
        config.gemini_model()
    );
    println!(
        "openai:     {} (model {})",
        configured(config.openai_api_key().is_some()),
        config.openai_model()
    );
    println!(
        "web search: {}",
        configured(config.serp_api_key().is_some())
    );
    Ok(())
}

fn configured(present: bool) -> &'static str {
    if present {
        "configured"
    } else {
        "not configured"
    }
}
