pub mod avatar;
pub mod purge;
pub mod threads;

use std::path::Path;

use parley_store::{db, SqliteThreadStore};

/// Open (creating if needed) and migrate the database at `path`
pub fn open_store(path: &str) -> Result<SqliteThreadStore, Box<dyn std::error::Error>> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(SqliteThreadStore::new(db::open_migrated(path)?))
}
