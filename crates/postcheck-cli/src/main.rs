//! `postcheck` -- check a social media post before publishing it.
//!
//! Provides the following subcommands:
//!
//! - `postcheck check` -- Classify a post and, if it is not SAFE, rewrite it.
//! - `postcheck config` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;

/// Safety check for social media posts.
#[derive(Parser)]
#[command(name = "postcheck", about = "Safety check for social media posts", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Classify a post and suggest a safer version.
    Check(commands::check::CheckArgs),

    /// Show resolved configuration.
    Config {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => commands::check::run(args).await?,
        Commands::Config { config } => {
            let cfg = commands::load_config(config.as_deref())?;
            commands::config_cmd::config_show(&cfg)?;
        }
    }

    Ok(())
}
