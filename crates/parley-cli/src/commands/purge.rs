//! Trashed message purge command

use chrono::Utc;
use clap::Args;
use parley_core::config::MessengerConfig;
use parley_store::purge::purge_messages;

#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// Grace period in days; defaults to `purge.message_days` from config
    #[arg(long)]
    pub days: Option<u32>,

    #[arg(long, default_value = ".parley/parley.db")]
    pub db: String,
}

pub fn execute(args: PurgeArgs, config: &MessengerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let days = args.days.unwrap_or(config.purge.message_days);
    let store = super::open_store(&args.db)?;

    let purged = store.with_connection(|conn| purge_messages(conn, days, Utc::now()))?;

    println!("Purged {} message(s) trashed more than {} day(s) ago", purged, days);
    Ok(())
}
