//! Filesystem storage for thread assets

pub mod atomic;
pub mod fs_store;

pub use fs_store::FsAssetStore;
