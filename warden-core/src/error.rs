//! Error types for WARDEN operations.

use crate::snapshot::RecordId;
use thiserror::Error;

/// Errors surfaced by the remote authority for a single fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorityError {
    /// The authority does not know the record. Terminal: retrying is
    /// pointless and wasteful.
    #[error("record not found: {record_id}")]
    NotFound { record_id: RecordId },

    /// The authority could not be contacted. Transient: the caller may
    /// retry.
    #[error("authority unreachable: {reason}")]
    Unreachable { reason: String },
}

/// Errors produced by a bounded-retry execution wrapping an operation
/// that fails with `E`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetryError<E: std::error::Error> {
    /// Every attempt failed with a transient error.
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },

    /// The operation failed with a non-transient error; no further
    /// attempts were made.
    #[error("non-retryable failure: {0}")]
    Permanent(E),

    /// The caller's cancellation token fired before the attempts completed.
    #[error("cancelled while retrying")]
    Cancelled,
}

/// Cache layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Master error type for all WARDEN operations.
#[derive(Debug, Clone, Error)]
pub enum WardenError {
    #[error("authority error: {0}")]
    Authority(#[from] AuthorityError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The caller gave up. Propagated as an error, never converted into a
    /// verdict, so callers can distinguish it from a deny.
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type alias for WARDEN operations.
pub type WardenResult<T> = Result<T, WardenError>;

/// Classifies errors into transient (worth retrying) and terminal.
pub trait Transient {
    /// Whether a retry could plausibly succeed.
    fn is_transient(&self) -> bool;
}

impl Transient for AuthorityError {
    fn is_transient(&self) -> bool {
        match self {
            AuthorityError::NotFound { .. } => false,
            AuthorityError::Unreachable { .. } => true,
        }
    }
}
