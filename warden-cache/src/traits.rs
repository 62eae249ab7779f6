//! Cache backend trait and statistics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use warden_core::{RecordId, RecordSnapshot, WardenResult};

/// Pluggable storage for cached snapshots.
///
/// Backends are dumb storage: they keep `(snapshot, cached_at)` pairs and
/// know nothing about TTLs. Expiry policy lives in [`RecordCache`], which
/// interprets `cached_at` against its configured TTL.
///
/// Implementations must be thread-safe and must replace entries atomically:
/// a concurrent reader observes either the old or the new snapshot, never a
/// torn one.
///
/// [`RecordCache`]: crate::RecordCache
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get a snapshot and the time it was cached, if present.
    async fn get(
        &self,
        record_id: &RecordId,
    ) -> WardenResult<Option<(RecordSnapshot, DateTime<Utc>)>>;

    /// Store or replace the entry for the snapshot's record id.
    async fn put(&self, snapshot: &RecordSnapshot, cached_at: DateTime<Utc>) -> WardenResult<()>;

    /// Remove an entry. Returns whether one was present.
    async fn delete(&self, record_id: &RecordId) -> WardenResult<bool>;

    /// Remove all entries. Returns how many were removed.
    async fn clear(&self) -> WardenResult<u64>;

    /// Number of entries currently stored.
    async fn entry_count(&self) -> WardenResult<u64>;

    /// Number of entries evicted to make room for new ones.
    async fn evictions(&self) -> WardenResult<u64>;
}

/// Statistics about cache usage, for operational tuning.
///
/// Hit/miss counts are TTL-aware (an expired entry counts as a miss) and
/// are tracked by [`RecordCache`]; entry and eviction counts come from the
/// backend.
///
/// [`RecordCache`]: crate::RecordCache
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads served from a fresh cached snapshot.
    pub hits: u64,
    /// Reads that found nothing usable (absent or expired).
    pub misses: u64,
    /// Entries currently stored.
    pub entry_count: u64,
    /// Entries evicted due to capacity.
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate in `[0.0, 1.0]`; 0.0 when no reads have happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
