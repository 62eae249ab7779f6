//! WARDEN Cache - TTL Record Cache
//!
//! Cache-aside layer keyed by record id, holding the last-known
//! authoritative snapshot and when it was cached. The verification service
//! checks here first and populates on miss; expiry is lazy (checked on
//! read) so no background sweeper thread is needed.

pub mod memory;
pub mod record_cache;
pub mod traits;

pub use memory::InMemoryCacheBackend;
pub use record_cache::RecordCache;
pub use traits::{CacheBackend, CacheStats};
