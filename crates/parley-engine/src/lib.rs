//! Parley Engine - Orchestration layer
//!
//! Coordinates core rules and projections with the persistence, storage
//! and delivery collaborators injected by the caller.

pub mod commands;

pub use commands::avatar::{update_group_avatar, AvatarDeps, AvatarOutcome, MutationContext};
pub use commands::collection::{
    call_collection, respond, safe_transform, thread_collection, CollectionEnv, CollectionItem,
};
