mod catalog;
mod ratings;
mod sessions;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use treon_core::AppConfig;
use treon_store::FileStore;

use catalog::CatalogCommands;
use ratings::RatingsCommands;
use sessions::SessionsCommands;

#[derive(Debug, Parser)]
#[command(name = "treon-cli")]
#[command(about = "Treon kiosk ratings and session reports")]
struct Cli {
    /// Ratings JSON file (overrides TREON_RATINGS_PATH)
    #[arg(long, global = true)]
    ratings_path: Option<PathBuf>,

    /// Sessions JSON file (overrides TREON_SESSIONS_PATH)
    #[arg(long, global = true)]
    sessions_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rating rollups and submissions
    Ratings {
        #[command(subcommand)]
        command: RatingsCommands,
    },
    /// Session duration and volume reports
    Sessions {
        #[command(subcommand)]
        command: SessionsCommands,
    },
    /// Product catalog checks
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = treon_core::load_app_config()?;
    apply_overrides(&mut config, &cli);

    // Logs go to stderr so `--json` output stays machine-readable.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("treon-cli: see --help for available commands");
        return Ok(());
    };

    let store = FileStore::from_app_config(&config)?;
    tracing::debug!(
        env = %config.env,
        ratings = %config.ratings_path.display(),
        sessions = %config.sessions_path.display(),
        "store ready"
    );

    match command {
        Commands::Ratings { command } => ratings::run(&store, command),
        Commands::Sessions { command } => sessions::run(&store, &config, command),
        Commands::Catalog { command } => catalog::run(&store, command),
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(path) = &cli.ratings_path {
        config.ratings_path.clone_from(path);
    }
    if let Some(path) = &cli.sessions_path {
        config.sessions_path.clone_from(path);
    }
}

#[cfg(test)]
mod tests;
