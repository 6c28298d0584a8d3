//! MAPRA - single-agent research assistant

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

mod commands;

use commands::{ask_command, init_command, status_command};

/// MAPRA - a plan-act-observe agent for your terminal
#[derive(Parser)]
#[command(name = "mapra")]
#[command(about = "Single-agent research assistant")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Use a specific config file instead of ~/.mapra/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the config file
    Init,
    /// Ask the agent a question and print the result as JSON
    Ask {
        /// The question to answer
        query: String,
        /// Extra context carried into every planning prompt
        #[arg(short, long, default_value = "")]
        memory: String,
    },
    /// Show which providers and tools are configured
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        tracing_subscriber::fmt::init();
    }

    match cli.command {
        Commands::Init => {
            if let Err(e) = init_command(cli.config).await {
                error!("Init failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Ask { query, memory } => {
            if let Err(e) = ask_command(&query, &memory, cli.config).await {
                error!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Status => {
            if let Err(e) = status_command(cli.config).await {
                error!("Status failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}
