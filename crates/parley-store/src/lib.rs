//! Parley Store - persistence and file storage adapters
//!
//! Provides:
//! - SQLite schema with checksummed embedded migrations
//! - `SqliteThreadStore`, the `EntityStore` and thread `CollectionSource`
//! - `FsAssetStore`, a filesystem `AssetStore` with atomic writes
//! - Purge of soft-deleted text messages

pub mod assets;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod purge;
pub mod repo;

pub use assets::FsAssetStore;
pub use errors::Result;
pub use repo::SqliteThreadStore;
