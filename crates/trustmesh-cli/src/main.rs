//! TrustMesh CLI — reputation reports over attestation exports.
//!
//! Subcommands: init, reputation.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{LogFormat, LoggingConfig, TrustmeshConfig};

/// TrustMesh — agent attestations and reputation.
#[derive(Parser, Debug)]
#[command(name = "trustmesh", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "trustmesh.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Compute a subject's reputation from an attestation export.
    Reputation(commands::reputation::ReputationArgs),
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // Logs go to stderr so report output on stdout stays machine-readable.
    // A subscriber may already be installed when commands run in-process.
    let _ = match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        // Runs on default logging so a broken config can still be replaced.
        Commands::Init(args) => {
            let mut logging = LoggingConfig::default();
            if let Some(level) = cli.log_level {
                logging.level = level;
            }
            init_tracing(&logging);
            commands::init::run(args, &cli.config)
        }
        Commands::Reputation(args) => {
            let mut config = TrustmeshConfig::load(&cli.config)?;
            if let Some(level) = cli.log_level {
                config.logging.level = level;
            }
            init_tracing(&config.logging);
            commands::reputation::run(args, &config).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    execute(Cli::parse()).await
}
