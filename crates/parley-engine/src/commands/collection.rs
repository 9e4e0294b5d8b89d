//! Collection responses with per-item failure isolation.
//!
//! A page is fetched in one go, then each item is projected on its own. An
//! item whose projection fails is reported and dropped; the rest of the
//! page is still returned. Only fetch and count failures fail the request.
//! Records that failed to load arrive as [`Loaded`] failures and are
//! dropped the same way.

use std::time::Instant;

use parley_core::config::MessengerConfig;
use parley_core::errors::{ParleyError, Result};
use parley_core::model::{Call, Provider, Thread};
use parley_core::pagination::{CollectionKind, CursorPaginator, Loaded, PageRequest, ResultPage};
use parley_core::ports::{CollectionSource, ErrorReporter};
use parley_core::render::{call_resource, thread_resource};
use parley_core::routes::Routes;
use parley_core_types::RequestContext;
use serde::Serialize;

use crate::commands::report_best_effort;

const OP: &str = "collection_respond";

/// Anything listed in a collection has a stable id the cursor can point at
pub trait CollectionItem {
    fn item_id(&self) -> &str;
}

impl CollectionItem for Thread {
    fn item_id(&self) -> &str {
        &self.id
    }
}

impl CollectionItem for Call {
    fn item_id(&self) -> &str {
        &self.id
    }
}

impl<T> CollectionItem for Loaded<T> {
    fn item_id(&self) -> &str {
        &self.id
    }
}

/// Shared environment of every collection response
#[derive(Clone, Copy)]
pub struct CollectionEnv<'a> {
    pub config: &'a MessengerConfig,
    pub routes: &'a Routes,
    pub reporter: &'a dyn ErrorReporter,
    pub request: &'a RequestContext,
}

/// Project every item, dropping (and reporting) the ones that fail.
///
/// Output order follows input order.
pub fn safe_transform<T, R, F>(
    items: &[T],
    collection: &str,
    transform: F,
    env: &CollectionEnv<'_>,
) -> Vec<serde_json::Value>
where
    T: CollectionItem,
    R: Serialize,
    F: Fn(&T) -> Result<R>,
{
    items
        .iter()
        .filter_map(|item| {
            let projected = transform(item)
                .and_then(|resource| serde_json::to_value(resource).map_err(ParleyError::from));
            match projected {
                Ok(value) => Some(value),
                Err(e) => {
                    let err = match e {
                        item_err @ ParleyError::ItemSerialization { .. } => item_err,
                        other => ParleyError::ItemSerialization {
                            collection: collection.to_string(),
                            item_id: item.item_id().to_string(),
                            reason: other.to_string(),
                        },
                    };
                    report_best_effort(env.reporter, env.request, item.item_id(), err);
                    None
                }
            }
        })
        .collect()
}

/// Fetch one page from `source` and assemble the response.
///
/// # Errors
///
/// Fetch or count failures from `source`, including an undecodable cursor.
pub fn respond<T, R, F>(
    source: &dyn CollectionSource<T>,
    kind: &CollectionKind,
    request: &PageRequest,
    transform: F,
    env: &CollectionEnv<'_>,
) -> Result<ResultPage>
where
    T: CollectionItem,
    R: Serialize,
    F: Fn(&T) -> Result<R>,
{
    let start = Instant::now();
    parley_core::log_op_start!(
        OP,
        collection = kind.name(),
        index = request.is_index(),
        request_id = env.request.request_id.as_str()
    );

    let result = build_page(source, kind, request, transform, env);
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok((page, fetched)) => {
            parley_core::log_op_end!(
                OP,
                duration_ms = duration_ms,
                collection = kind.name(),
                results = page.meta.results,
                dropped = fetched - page.meta.results
            );
        }
        Err(e) => {
            parley_core::log_op_error!(
                OP,
                e.clone(),
                duration_ms = duration_ms,
                collection = kind.name()
            );
        }
    }

    result.map(|(page, _)| page)
}

fn build_page<T, R, F>(
    source: &dyn CollectionSource<T>,
    kind: &CollectionKind,
    request: &PageRequest,
    transform: F,
    env: &CollectionEnv<'_>,
) -> Result<(ResultPage, usize)>
where
    T: CollectionItem,
    R: Serialize,
    F: Fn(&T) -> Result<R>,
{
    let paginator = CursorPaginator::new(kind, env.config, env.routes);

    let batch = source.fetch(request, paginator.per_page(request))?;
    let total = if paginator.wants_total(request) {
        Some(source.count()?)
    } else {
        None
    };

    let data = safe_transform(&batch.items, kind.name(), transform, env);
    let last_fetched = batch.items.last().map(CollectionItem::item_id);
    let meta = paginator.meta(request, batch.has_more, last_fetched, data.len(), total);

    Ok((ResultPage { data, meta }, batch.items.len()))
}

/// Threads listing as seen by `viewer`
///
/// # Errors
///
/// See [`respond`].
pub fn thread_collection(
    source: &dyn CollectionSource<Loaded<Thread>>,
    kind: &CollectionKind,
    request: &PageRequest,
    viewer: &Provider,
    env: &CollectionEnv<'_>,
) -> Result<ResultPage> {
    respond(
        source,
        kind,
        request,
        |loaded: &Loaded<Thread>| thread_resource(loaded.model()?, viewer, env.routes),
        env,
    )
}

/// Calls placed in `thread`
///
/// # Errors
///
/// See [`respond`].
pub fn call_collection(
    source: &dyn CollectionSource<Call>,
    thread: &Thread,
    request: &PageRequest,
    env: &CollectionEnv<'_>,
) -> Result<ResultPage> {
    let kind = CollectionKind::Calls {
        thread_id: thread.id.clone(),
    };
    respond(
        source,
        &kind,
        request,
        |call: &Call| call_resource(call, thread),
        env,
    )
}
