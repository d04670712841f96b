//! Doctalk CLI
//!
//! Main entry point for the doctalk command-line tool.
//! Provides document question answering backed by a tool-using agent.

mod commands;
mod extract;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, SearchCommand};
use doctalk_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Doctalk CLI - document question answering with a tool-using agent
#[derive(Parser, Debug)]
#[command(name = "doctalk")]
#[command(about = "Document question answering with a tool-using agent", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "DOCTALK_CONFIG")]
    config: Option<PathBuf>,

    /// LLM provider (gemini, ollama)
    #[arg(short, long, global = true, env = "DOCTALK_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "DOCTALK_MODEL")]
    model: Option<String>,

    /// Custom backend endpoint URL
    #[arg(long, global = true, env = "DOCTALK_ENDPOINT")]
    endpoint: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat session over ingested documents
    Chat(ChatCommand),

    /// Ask a single question, optionally ingesting a document first
    Ask(AskCommand),

    /// Inspect retrieval results for a query
    Search(SearchCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment; the --config flag
    // names the file to read
    let config = AppConfig::load(cli.config.clone())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.endpoint,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    // Reject broken configuration before any component is built
    config.validate()?;

    // Log startup
    tracing::info!("Doctalk CLI starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Embedding provider: {}", config.embedding_provider);

    // Emit command span
    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
