//! WARDEN Service - Compliance Verification
//!
//! Orchestrates one compliance check: try the cache, on miss fetch from the
//! remote authority through a bounded-retry executor, update the cache, and
//! decide. When the authority cannot be consulted the service fails closed:
//! it denies rather than risk exceeding a hard resource limit.

pub mod remote;
pub mod retry;
pub mod service;

pub use remote::{HttpAuthorityClient, RemoteAuthority};
pub use retry::RetryExecutor;
pub use service::VerificationService;
