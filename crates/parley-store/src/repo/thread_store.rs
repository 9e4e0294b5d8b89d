//! `SqliteThreadStore`: threads persisted in SQLite
//!
//! Serves both the avatar pipeline (`EntityStore`) and thread listings
//! (`CollectionSource<Loaded<Thread>>`). Listings are ordered most recently
//! updated first; the cursor names the last thread of the previous page
//! and the next page starts strictly after its `(updated_at, id)` position.
//! Listed rows are hydrated one by one, so a corrupt row surfaces as a
//! failed item rather than a failed page.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use parley_core::errors::ParleyError;
use parley_core::model::{Thread, ThreadType};
use parley_core::pagination::{FetchedBatch, Loaded, PageRequest};
use parley_core::ports::{CollectionSource, EntityStore, ThreadUpdate, UpdateOptions};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{from_rusqlite, Result};
use crate::repo::hydration::{ThreadRow, THREAD_COLUMNS};

pub struct SqliteThreadStore {
    conn: Mutex<Connection>,
}

impl SqliteThreadStore {
    /// Wrap an already migrated connection
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Fresh migrated in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = crate::db::open_in_memory()?;
        crate::db::configure(&conn)?;
        crate::migrations::apply_migrations(&mut conn)?;
        Ok(Self::new(conn))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ParleyError::Internal {
            message: "thread store connection poisoned".to_string(),
        })
    }

    /// Run `f` against the underlying connection
    pub fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Insert a new thread as-is, timestamps included
    pub fn insert(&self, thread: &Thread) -> Result<()> {
        let participants = serde_json::to_string(&thread.participants)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO threads (id, type, subject, image, add_participants, invitations, \
             calling, messaging, knocks, participants, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                thread.id,
                thread.thread_type.code(),
                thread.subject,
                thread.image,
                thread.add_participants,
                thread.invitations,
                thread.calling,
                thread.messaging,
                thread.knocks,
                participants,
                thread.created_at.timestamp_millis(),
                thread.updated_at.timestamp_millis(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Listing over every thread, or only threads of one type
    pub fn collection(&self, thread_type: Option<ThreadType>) -> ThreadCollection<'_> {
        ThreadCollection {
            store: self,
            thread_type,
        }
    }
}

impl EntityStore for SqliteThreadStore {
    fn get(&self, thread_id: &str) -> Result<Thread> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM threads WHERE id = ?1", THREAD_COLUMNS),
                [thread_id],
                ThreadRow::from_row,
            )
            .optional()
            .map_err(from_rusqlite)?;

        match row {
            Some(row) => row.hydrate(),
            None => Err(ParleyError::ThreadNotFound {
                thread_id: thread_id.to_string(),
            }),
        }
    }

    fn update(&self, thread_id: &str, update: &ThreadUpdate, options: UpdateOptions) -> Result<()> {
        let conn = self.lock()?;
        let changed = match update {
            ThreadUpdate::Image(image) if options.skip_audit => conn.execute(
                "UPDATE threads SET image = ?1 WHERE id = ?2",
                params![image, thread_id],
            ),
            ThreadUpdate::Image(image) => conn.execute(
                "UPDATE threads SET image = ?1, updated_at = ?2 WHERE id = ?3",
                params![image, Utc::now().timestamp_millis(), thread_id],
            ),
        }
        .map_err(from_rusqlite)?;

        if changed == 0 {
            return Err(ParleyError::ThreadNotFound {
                thread_id: thread_id.to_string(),
            });
        }

        tracing::debug!(thread_id, skip_audit = options.skip_audit, "thread updated");
        Ok(())
    }
}

/// Cursor-paginated listing of threads, most recently updated first
pub struct ThreadCollection<'a> {
    store: &'a SqliteThreadStore,
    thread_type: Option<ThreadType>,
}

impl ThreadCollection<'_> {
    fn type_filter(&self) -> Option<u8> {
        self.thread_type.map(ThreadType::code)
    }
}

impl CollectionSource<Loaded<Thread>> for ThreadCollection<'_> {
    fn fetch(&self, request: &PageRequest, limit: usize) -> Result<FetchedBatch<Loaded<Thread>>> {
        let conn = self.store.lock()?;

        // Position strictly before which the page starts
        let (anchor_updated, anchor_id) = match &request.cursor {
            Some(cursor) => {
                let id = cursor.item_id()?;
                let updated: i64 = conn
                    .query_row("SELECT updated_at FROM threads WHERE id = ?1", [&id], |row| {
                        row.get(0)
                    })
                    .optional()
                    .map_err(from_rusqlite)?
                    .ok_or_else(|| ParleyError::ThreadNotFound { thread_id: id.clone() })?;
                (updated, id)
            }
            None => (i64::MAX, String::new()),
        };

        // SQLite treats a negative LIMIT as unbounded
        let sql_limit: i64 = if request.paginate {
            i64::try_from(limit).unwrap_or(i64::MAX - 1) + 1
        } else {
            -1
        };

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM threads \
                 WHERE (?1 IS NULL OR type = ?1) \
                   AND (updated_at < ?2 OR (updated_at = ?2 AND id < ?3)) \
                 ORDER BY updated_at DESC, id DESC \
                 LIMIT ?4",
                THREAD_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map(
                params![self.type_filter(), anchor_updated, anchor_id, sql_limit],
                ThreadRow::from_row,
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        let threads: Vec<Loaded<Thread>> = rows
            .into_iter()
            .map(|row| {
                let id = row.id.clone();
                match row.hydrate() {
                    Ok(thread) => Loaded::ready(id, thread),
                    Err(e) => {
                        tracing::warn!(thread_id = %id, error = %e, "thread row failed to hydrate");
                        Loaded::failed(id, e)
                    }
                }
            })
            .collect();

        Ok(if request.paginate {
            FetchedBatch::from_overshot(threads, limit)
        } else {
            FetchedBatch::complete(threads)
        })
    }

    fn count(&self) -> Result<u64> {
        let conn = self.store.lock()?;
        let total: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM threads WHERE (?1 IS NULL OR type = ?1)",
                params![self.type_filter()],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
