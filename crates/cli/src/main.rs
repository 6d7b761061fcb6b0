//! unitchat CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive or single-message chat (default)
//! - `tools`   — List the tools offered to the model
//! - `doctor`  — Diagnose configuration and systemd access
//! - `init`    — Write a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use unitchat_config::AppConfig;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(
    name = "unitchat",
    about = "Chat with an LLM that can inspect your systemd units",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.unitchat/config.toml
    #[arg(short, long, global = true, env = "UNITCHAT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List the tools available to the model
    Tools,

    /// Diagnose configuration, provider and systemd access
    Doctor,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr and stay quiet by default so they don't interleave with the chat
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);

    match cli.command.unwrap_or(Commands::Chat { message: None }) {
        Commands::Chat { message } => commands::chat::run(&config_path, message).await?,
        Commands::Tools => commands::tools::run(&config_path)?,
        Commands::Doctor => commands::doctor::run(&config_path).await?,
        Commands::Init { force } => commands::init::run(&config_path, force)?,
    }

    Ok(())
}
