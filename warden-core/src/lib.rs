//! WARDEN Core - Data Types and Decision Logic
//!
//! Shared types for the WARDEN compliance-verification library: record
//! snapshots, verdicts, the error taxonomy, configuration, cooperative
//! cancellation, and the pure limit-check decision.
//! Cache and service orchestration live in warden-cache and warden-service.

pub mod cancel;
pub mod compliance;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod verdict;

pub use cancel::{CancelToken, DeadlineCancel, ManualCancel, NeverCancel};
pub use compliance::ComplianceChecker;
pub use config::{CacheConfig, RetryConfig, WardenConfig};
pub use error::{
    AuthorityError, CacheError, ConfigError, RetryError, Transient, WardenError, WardenResult,
};
pub use snapshot::{RecordId, RecordSnapshot};
pub use verdict::{VerdictReason, VerificationResult};
