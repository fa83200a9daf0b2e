mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dune-sync",
    version,
    about = "Sync tabular data between Dune and PostgreSQL"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all configured jobs once
    Run {
        /// Path to the job configuration YAML
        config: PathBuf,
    },
    /// Validate the job configuration without contacting either system
    Check {
        /// Path to the job configuration YAML
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Run { config } => commands::run::execute(&config).await,
        Commands::Check { config } => commands::check::execute(&config),
    }
}
