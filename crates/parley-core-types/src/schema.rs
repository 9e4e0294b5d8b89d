//! Canonical field keys and event names for structured logging

pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_THREAD_ID: &str = "thread_id";

// Mutation / collection outcomes
pub const FIELD_CHANGED: &str = "changed";
pub const FIELD_COLLECTION: &str = "collection";
pub const FIELD_RESULTS: &str = "results";
pub const FIELD_DROPPED: &str = "dropped";

// Error fields
pub const FIELD_ERR_CODE: &str = "err.code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
/// A failure that was reported but did not fail the enclosing operation
pub const EVENT_BEST_EFFORT_FAILURE: &str = "best_effort_failure";
