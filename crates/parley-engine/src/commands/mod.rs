//! Command orchestration layer.
//!
//! Each command owns its boundary logging (`log_op_start` / `log_op_end` /
//! `log_op_error`); collaborators only log at debug level.

pub mod avatar;
pub mod collection;

use parley_core::errors::{ExError, ParleyError};
use parley_core::ports::ErrorReporter;
use parley_core_types::RequestContext;

/// Attach request correlation to a best-effort failure and report it
pub(crate) fn report_best_effort(
    reporter: &dyn ErrorReporter,
    request: &RequestContext,
    entity_id: &str,
    err: ParleyError,
) {
    let mut ex = ExError::from(err)
        .with_entity_id(entity_id)
        .with_request_id(request.request_id.clone());
    if let Some(trace_id) = &request.trace_id {
        ex = ex.with_trace_id(trace_id.clone());
    }
    reporter.report(&ex);
}
