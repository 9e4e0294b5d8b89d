//! Thread listing command

use clap::{Args, ValueEnum};
use parley_core::config::MessengerConfig;
use parley_core::core_types::RequestContext;
use parley_core::model::{Provider, ThreadType};
use parley_core::pagination::{CollectionKind, Cursor, PageRequest};
use parley_core::ports::TracingErrorReporter;
use parley_core::routes::Routes;
use parley_engine::{thread_collection, CollectionEnv};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListKind {
    Threads,
    Privates,
    Groups,
}

impl ListKind {
    fn collection(self) -> (CollectionKind, Option<ThreadType>) {
        match self {
            ListKind::Threads => (CollectionKind::Threads, None),
            ListKind::Privates => (CollectionKind::Privates, Some(ThreadType::Private)),
            ListKind::Groups => (CollectionKind::Groups, Some(ThreadType::Group)),
        }
    }
}

#[derive(Debug, Args)]
pub struct ThreadsArgs {
    #[arg(long, value_enum, default_value = "threads")]
    pub kind: ListKind,

    /// Cursor from a previous page's `next_page_id`
    #[arg(long, conflicts_with = "all")]
    pub page: Option<String>,

    /// Return every thread in one response
    #[arg(long)]
    pub all: bool,

    /// Provider the listing is rendered for
    #[arg(long, default_value = "cli")]
    pub viewer: String,

    #[arg(long, default_value = ".parley/parley.db")]
    pub db: String,
}

pub fn execute(args: ThreadsArgs, config: &MessengerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(&args.db)?;
    let routes = Routes::from_config(config);
    let request_ctx = RequestContext::new();
    let env = CollectionEnv {
        config,
        routes: &routes,
        reporter: &TracingErrorReporter,
        request: &request_ctx,
    };

    let request = match (&args.page, args.all) {
        (Some(page), _) => PageRequest::after(Cursor::parse(page)?),
        (None, true) => PageRequest::exhaustive(),
        (None, false) => PageRequest::index(),
    };

    let (kind, thread_type) = args.kind.collection();
    let viewer = Provider::new(args.viewer, "user", "");
    let source = store.collection(thread_type);
    let page = thread_collection(&source, &kind, &request, &viewer, &env)?;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
