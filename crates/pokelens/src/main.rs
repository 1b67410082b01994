//! Pokelens - identify a Pokémon from a photo and get a localized summary.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service (POST /identify_pokemon)
//! GEMINI_API_KEY=... pokelens serve --port 8000
//!
//! # Identify a local image
//! pokelens identify ./pikachu.png --lang fr
//!
//! # View configuration
//! pokelens config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

/// Pokelens - identify a Pokémon from a photo and get a localized summary.
#[derive(Parser, Debug)]
#[command(name = "pokelens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "POKELENS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP identification service
    Serve(cli::serve::ServeArgs),

    /// Identify the Pokémon in a local image file
    Identify(cli::identify::IdentifyArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => pokelens_core::Config::load_from(path)?,
        None => match pokelens_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `pokelens config path`."
                );
                pokelens_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Pokelens v{}", pokelens_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Identify(args) => cli::identify::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config, config).await,
    }
}
