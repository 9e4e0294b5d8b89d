//! Parley CLI
//!
//! Operator commands over a messenger database and asset root

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parley_core::config::MessengerConfig;
use parley_core::logging_facility;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "parley")]
#[command(about = "Parley - messenger maintenance and inspection", long_about = None)]
struct Cli {
    /// TOML config file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Group avatar operations
    Avatar(commands::avatar::AvatarArgs),
    /// List threads a page at a time
    Threads(commands::threads::ThreadsArgs),
    /// Permanently delete text messages trashed long enough ago
    PurgeMessages(commands::purge::PurgeArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<MessengerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(MessengerConfig::load(path)?),
        None => Ok(MessengerConfig::default()),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_ref()).and_then(|config| {
        logging_facility::init(config.logging.profile);
        match cli.command {
            Commands::Avatar(args) => commands::avatar::execute(args, &config),
            Commands::Threads(args) => commands::threads::execute(args, &config),
            Commands::PurgeMessages(args) => commands::purge::execute(args, &config),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
