//! Error types for COURIER operations

use thiserror::Error;

/// Dispatch layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No handler registered for {request}")]
    HandlerNotFound { request: &'static str },

    #[error("A handler is already registered for {request}")]
    DuplicateHandler { request: &'static str },

    #[error("Failed to encode {request} payload: {reason}")]
    EncodePayload {
        request: &'static str,
        reason: String,
    },
}

/// Local store and repository errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Serialization failed: {reason}")]
    Serialize { reason: String },

    #[error("Deserialization failed for key {key}: {reason}")]
    Deserialize { key: String, reason: String },

    #[error("Store I/O failed: {reason}")]
    Io { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Cache errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache lock poisoned")]
    LockPoisoned,

    #[error("Cached value under {key} does not match the expected result type")]
    TypeMismatch { key: String },
}

/// Remote sync errors. These never surface to the original command caller;
/// a failed push leaves the record in the outbox for a later attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Sync transport failed: {reason}")]
    Transport { reason: String },

    #[error("Remote endpoint rejected the record with status {status}")]
    Rejected { status: u16 },
}

/// Validation errors, raised by callers before dispatch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Umbrella error for all COURIER operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CourierError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result alias used across the workspace.
pub type CourierResult<T> = Result<T, CourierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_not_found_names_the_request() {
        let err = DispatchError::HandlerNotFound {
            request: "CreateTodo",
        };
        assert!(err.to_string().contains("CreateTodo"));
    }

    #[test]
    fn umbrella_preserves_the_variant() {
        let err: CourierError = SyncError::Rejected { status: 502 }.into();
        assert_eq!(err, CourierError::Sync(SyncError::Rejected { status: 502 }));
    }
}
