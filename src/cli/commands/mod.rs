//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod ask;
mod feedback;
mod helpers;
mod init;
mod serve;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

/// Default address for `serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[derive(Parser)]
#[command(name = "advisor")]
#[command(about = "LLM advice service with rate limiting and a feedback store")]
#[command(version)]
pub struct Cli {
    /// Config file path (TOML)
    #[arg(short, long, global = true, env = "ADVISOR_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory (overrides config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Start the web server
    Serve {
        /// Address to bind: PORT, HOST, or HOST:PORT
        #[arg(short, long, default_value = DEFAULT_BIND, env = "ADVISOR_BIND")]
        bind: String,
    },

    /// Show feedback statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent feedback
    Feedback {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },

    /// Ask for structured advice from the terminal
    Ask {
        /// The question (joined with spaces)
        #[arg(required = true)]
        message: Vec<String>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
        Commands::Stats { json } => stats::cmd_stats(&settings, json).await,
        Commands::Feedback { limit } => feedback::cmd_feedback(&settings, limit).await,
        Commands::Ask { message } => ask::cmd_ask(&settings, &message.join(" ")).await,
    }
}
