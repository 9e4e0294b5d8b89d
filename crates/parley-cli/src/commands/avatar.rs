//! Group avatar commands

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use parley_core::config::MessengerConfig;
use parley_core::model::{AvatarChange, AvatarUpload, Provider};
use parley_core::ports::{
    EntityStore, LoggingBroadcastDriver, LoggingEventDispatcher, TracingErrorReporter,
};
use parley_core::routes::Routes;
use parley_engine::{update_group_avatar, AvatarDeps, MutationContext};
use parley_store::FsAssetStore;

#[derive(Debug, Args)]
pub struct AvatarArgs {
    #[command(subcommand)]
    pub command: AvatarCommand,
}

#[derive(Debug, Subcommand)]
pub enum AvatarCommand {
    /// Replace a group thread's avatar
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(long)]
    pub thread: String,

    /// Switch to this protected default avatar
    #[arg(long = "default", conflicts_with = "file")]
    pub default_image: Option<String>,

    /// Upload this image file
    #[arg(long, conflicts_with = "default_image")]
    pub file: Option<PathBuf>,

    /// Provider id recorded as the actor
    #[arg(long, default_value = "cli")]
    pub actor: String,

    #[arg(long, default_value = "Parley CLI")]
    pub actor_name: String,

    /// Abandon the change if not committed within this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long, default_value = ".parley/parley.db")]
    pub db: String,

    /// Root directory holding one subdirectory per storage disk
    #[arg(long, default_value = ".parley/storage")]
    pub assets: String,
}

pub fn execute(args: AvatarArgs, config: &MessengerConfig) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        AvatarCommand::Set(set_args) => execute_set(set_args, config),
    }
}

fn read_change(args: &SetArgs) -> Result<AvatarChange, Box<dyn std::error::Error>> {
    match (&args.default_image, &args.file) {
        (Some(name), None) => Ok(AvatarChange::Default(name.clone())),
        (None, Some(path)) => {
            let bytes = std::fs::read(path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(AvatarChange::Upload(AvatarUpload::new(file_name, bytes)))
        }
        _ => Err("Must specify either --default or --file".into()),
    }
}

fn execute_set(args: SetArgs, config: &MessengerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let change = read_change(&args)?;

    let threads = super::open_store(&args.db)?;
    let assets = FsAssetStore::new(&args.assets);
    let routes = Routes::from_config(config);
    let deps = AvatarDeps {
        threads: &threads,
        assets: &assets,
        broadcaster: &LoggingBroadcastDriver,
        events: &LoggingEventDispatcher,
        flags: config,
        reporter: &TracingErrorReporter,
        config,
        routes: &routes,
    };

    let mut ctx = MutationContext::new(Provider::new(args.actor, "user", args.actor_name));
    if let Some(ms) = args.timeout_ms {
        ctx = ctx.with_timeout(Duration::from_millis(ms));
    }

    let mut thread = threads.get(&args.thread)?;
    let outcome = update_group_avatar(&mut thread, change, &ctx, &deps)?;

    let report = serde_json::json!({
        "changed": outcome.changed,
        "image": outcome.thread.image,
        "resource": outcome.resource,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
