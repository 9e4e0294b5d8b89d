//! Cursor pagination over ordered result sets
//!
//! Sources over-fetch one item past the page size so the final page can be
//! detected without a count query. Cursors are opaque URL-safe base64
//! encodings of the last fetched item id. They mark a position, not a
//! snapshot: rows inserted or removed between requests shift later pages.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;

use crate::config::{MessengerConfig, PageSizes};
use crate::errors::{ParleyError, Result};
use crate::routes::Routes;

/// Opaque position marker handed back to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    /// Cursor pointing just past `item_id`
    pub fn after(item_id: &str) -> Self {
        Self(URL_SAFE_NO_PAD.encode(item_id.as_bytes()))
    }

    /// Accept a client-supplied cursor.
    ///
    /// # Errors
    ///
    /// `InvalidCursor` if it does not decode to a UTF-8 item id.
    pub fn parse(encoded: &str) -> Result<Self> {
        let cursor = Self(encoded.to_string());
        cursor.item_id()?;
        Ok(cursor)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The item id this cursor points past.
    ///
    /// # Errors
    ///
    /// `InvalidCursor` if the encoding is corrupt.
    pub fn item_id(&self) -> Result<String> {
        let invalid = || ParleyError::InvalidCursor {
            cursor: self.0.clone(),
        };
        let bytes = URL_SAFE_NO_PAD.decode(&self.0).map_err(|_| invalid())?;
        String::from_utf8(bytes).map_err(|_| invalid())
    }
}

/// What the client asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<Cursor>,
    /// `false` when the source returns the whole set in one go
    pub paginate: bool,
}

impl PageRequest {
    /// First page of a paginated listing
    pub fn index() -> Self {
        Self {
            cursor: None,
            paginate: true,
        }
    }

    pub fn after(cursor: Cursor) -> Self {
        Self {
            cursor: Some(cursor),
            paginate: true,
        }
    }

    /// Unpaginated listing of every item
    pub fn exhaustive() -> Self {
        Self {
            cursor: None,
            paginate: false,
        }
    }

    pub fn is_index(&self) -> bool {
        self.cursor.is_none()
    }
}

/// Items fetched for one page, in order
#[derive(Debug, Clone)]
pub struct FetchedBatch<T> {
    pub items: Vec<T>,
    /// Whether the source holds more items after the last one
    pub has_more: bool,
}

impl<T> FetchedBatch<T> {
    /// Build from an over-fetched slice of at most `limit + 1` items.
    pub fn from_overshot(mut raw: Vec<T>, limit: usize) -> Self {
        let has_more = raw.len() > limit;
        if has_more {
            raw.truncate(limit);
        }
        Self {
            items: raw,
            has_more,
        }
    }

    /// Every remaining item was fetched
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            has_more: false,
        }
    }
}

/// A fetched record whose conversion into a model may have failed.
///
/// The id is kept either way so the cursor can move past a broken record.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub id: String,
    pub item: Result<T>,
}

impl<T> Loaded<T> {
    pub fn ready(id: impl Into<String>, item: T) -> Self {
        Self {
            id: id.into(),
            item: Ok(item),
        }
    }

    pub fn failed(id: impl Into<String>, err: ParleyError) -> Self {
        Self {
            id: id.into(),
            item: Err(err),
        }
    }

    /// The loaded model, or a copy of the load failure
    ///
    /// # Errors
    ///
    /// Whatever prevented the record from loading.
    pub fn model(&self) -> Result<&T> {
        self.item.as_ref().map_err(Clone::clone)
    }
}

/// Which listing a page belongs to; selects page sizes and routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionKind {
    Threads,
    Privates,
    Groups,
    Calls { thread_id: String },
}

impl CollectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::Threads => "threads",
            CollectionKind::Privates => "privates",
            CollectionKind::Groups => "groups",
            CollectionKind::Calls { .. } => "calls",
        }
    }

    pub fn page_sizes(&self, config: &MessengerConfig) -> PageSizes {
        let c = &config.collections;
        match self {
            CollectionKind::Threads => c.threads,
            CollectionKind::Privates => c.privates,
            CollectionKind::Groups => c.groups,
            CollectionKind::Calls { .. } => c.calls,
        }
    }
}

/// Pagination metadata returned next to the items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// First page (no cursor supplied)
    pub index: bool,
    pub page_id: Option<String>,
    pub next_page_id: Option<String>,
    pub next_page_route: Option<String>,
    pub final_page: bool,
    pub per_page: usize,
    /// Items successfully serialized on this page
    pub results: usize,
    /// Total across all pages; only computed on the first page
    pub total: Option<u64>,
}

/// Serialized items plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    pub data: Vec<serde_json::Value>,
    pub meta: PageMeta,
}

/// Computes page sizes and metadata for one collection
#[derive(Debug, Clone)]
pub struct CursorPaginator<'a> {
    kind: &'a CollectionKind,
    sizes: PageSizes,
    routes: &'a Routes,
}

impl<'a> CursorPaginator<'a> {
    pub fn new(kind: &'a CollectionKind, config: &MessengerConfig, routes: &'a Routes) -> Self {
        Self {
            kind,
            sizes: kind.page_sizes(config),
            routes,
        }
    }

    pub fn kind(&self) -> &CollectionKind {
        self.kind
    }

    /// Items to fetch for this request; never less than one
    pub fn per_page(&self, request: &PageRequest) -> usize {
        let size = if request.is_index() {
            self.sizes.index_count
        } else {
            self.sizes.page_count
        };
        size.max(1)
    }

    /// Whether the expensive total count should run for this request
    pub fn wants_total(&self, request: &PageRequest) -> bool {
        request.is_index()
    }

    /// Build metadata for a page.
    ///
    /// `last_fetched_id` is the id of the last item *fetched*, whether or not
    /// it serialized, so a broken trailing item cannot stall the cursor.
    pub fn meta(
        &self,
        request: &PageRequest,
        has_more: bool,
        last_fetched_id: Option<&str>,
        results: usize,
        total: Option<u64>,
    ) -> PageMeta {
        let next = if request.paginate && has_more {
            last_fetched_id.map(Cursor::after)
        } else {
            None
        };

        PageMeta {
            index: request.is_index(),
            page_id: request.cursor.as_ref().map(|c| c.as_str().to_string()),
            next_page_route: next
                .as_ref()
                .map(|c| self.routes.collection_page(self.kind, c.as_str())),
            next_page_id: next.map(|c| c.0),
            final_page: !has_more,
            // An unpaginated listing is a single page holding everything
            per_page: if request.paginate {
                self.per_page(request)
            } else {
                results
            },
            results,
            total,
        }
    }
}
