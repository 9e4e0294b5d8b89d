use parley_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using ParleyError
pub type Result<T> = std::result::Result<T, ParleyError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable by API responses, error
/// reporters and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Rejections before any state change
    InvalidInput,
    NotFound,
    FeatureDisabled,

    // Collaborator failures
    StorageFailure,
    Persistence,
    Serialization,
    Timeout,

    // Best-effort failures (reported, never surfaced to the caller)
    CleanupFailure,
    ItemSerialization,
    DeliveryFailure,

    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::FeatureDisabled => "ERR_FEATURE_DISABLED",
            ExErrorKind::StorageFailure => "ERR_STORAGE_FAILURE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::CleanupFailure => "ERR_CLEANUP_FAILURE",
            ExErrorKind::ItemSerialization => "ERR_ITEM_SERIALIZATION",
            ExErrorKind::DeliveryFailure => "ERR_DELIVERY_FAILURE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether errors of this kind are reported instead of returned
    pub fn is_best_effort(&self) -> bool {
        matches!(
            self,
            ExErrorKind::CleanupFailure
                | ExErrorKind::ItemSerialization
                | ExErrorKind::DeliveryFailure
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the context needed to correlate a
/// failure with the request and entity it happened on.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for Parley operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParleyError {
    /// The requested operation is switched off by configuration
    #[error("Feature disabled: {message}")]
    FeatureDisabled { message: String },

    /// The avatar request failed validation
    #[error("Invalid avatar: {reason}")]
    InvalidAvatar { reason: String },

    /// Pagination cursor could not be decoded
    #[error("Invalid cursor: {cursor}")]
    InvalidCursor { cursor: String },

    /// Thread not found in the entity store
    #[error("Thread not found: {thread_id}")]
    ThreadNotFound { thread_id: String },

    /// Asset store rejected an upload, delete or read
    #[error("Storage failure during {op}: {message}")]
    Storage { op: String, message: String },

    /// Old asset could not be removed after the new reference was committed
    #[error("Cleanup of {path} failed: {message}")]
    CleanupFailed { path: String, message: String },

    /// One collection item could not be represented
    #[error("Could not serialize {collection} item {item_id}: {reason}")]
    ItemSerialization {
        collection: String,
        item_id: String,
        reason: String,
    },

    /// Broadcast or domain event could not be handed to its transport
    #[error("Delivery of {target} failed: {message}")]
    DeliveryFailed { target: String, message: String },

    /// Caller-supplied deadline expired before the commit point
    #[error("Operation {op} timed out before commit")]
    Timeout { op: String },

    /// Entity store failure
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// JSON / TOML encoding or decoding failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ParleyError {
    /// Shorthand for the structured kind of this error
    pub fn kind(&self) -> ExErrorKind {
        ExError::from(self.clone()).kind()
    }
}

impl From<ParleyError> for ExError {
    fn from(err: ParleyError) -> Self {
        let message = err.to_string();
        match err {
            ParleyError::FeatureDisabled { .. } => {
                ExError::new(ExErrorKind::FeatureDisabled).with_message(message)
            }
            ParleyError::InvalidAvatar { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate_avatar")
                .with_message(message),
            ParleyError::InvalidCursor { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("decode_cursor")
                .with_message(message),
            ParleyError::ThreadNotFound { thread_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(thread_id)
                .with_message("Thread not found"),
            ParleyError::Storage { op, .. } => ExError::new(ExErrorKind::StorageFailure)
                .with_op(op)
                .with_message(message),
            ParleyError::CleanupFailed { .. } => ExError::new(ExErrorKind::CleanupFailure)
                .with_op("remove_old_avatar")
                .with_message(message),
            ParleyError::ItemSerialization { item_id, .. } => {
                ExError::new(ExErrorKind::ItemSerialization)
                    .with_op("make_resource")
                    .with_entity_id(item_id)
                    .with_message(message)
            }
            ParleyError::DeliveryFailed { .. } => {
                ExError::new(ExErrorKind::DeliveryFailure).with_message(message)
            }
            ParleyError::Timeout { op } => ExError::new(ExErrorKind::Timeout)
                .with_op(op)
                .with_message(message),
            ParleyError::Persistence { .. } => {
                ExError::new(ExErrorKind::Persistence).with_message(message)
            }
            ParleyError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            ParleyError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ParleyError {
    fn from(err: serde_json::Error) -> Self {
        ParleyError::Serialization {
            message: err.to_string(),
        }
    }
}
