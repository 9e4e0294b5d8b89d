//! Parley Core - domain kernel of the messenger backend
//!
//! This crate holds everything that does not perform I/O:
//! - Thread, provider and call models plus avatar change requests
//! - Change detection and request validation rules
//! - Pure projections into API and broadcast resources
//! - Cursor pagination metadata
//! - Collaborator contracts (`ports`) implemented by store and transport crates
//! - The error facility, logging facility and configuration

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod pagination;
pub mod ports;
pub mod render;
pub mod routes;
pub mod rules;

/// Re-exported so the logging macros resolve schema constants through `$crate`
pub use parley_core_types as core_types;

pub use config::MessengerConfig;
pub use errors::{ExError, ExErrorKind, ParleyError, Result};
pub use model::{AvatarChange, AvatarUpload, Call, DomainEvent, Provider, Thread, ThreadType};
pub use pagination::{
    CollectionKind, Cursor, CursorPaginator, FetchedBatch, Loaded, PageRequest, ResultPage,
};
pub use routes::Routes;
