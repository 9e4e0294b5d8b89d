//! SQLite-backed thread repository

pub mod hydration;
pub mod thread_store;

pub use thread_store::{SqliteThreadStore, ThreadCollection};
