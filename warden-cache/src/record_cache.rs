//! TTL-aware record cache.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use warden_core::{CacheConfig, RecordId, RecordSnapshot, WardenResult};

use crate::memory::InMemoryCacheBackend;
use crate::traits::{CacheBackend, CacheStats};

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache-aside layer over a backend, with lazy TTL expiry.
///
/// `get` never returns an expired entry: staleness is checked on read
/// against the configured TTL and expired entries are dropped on the spot,
/// so no background sweeper is needed. `put` resets the expiry deadline to
/// `now + TTL`.
pub struct RecordCache<B: CacheBackend> {
    backend: Arc<B>,
    config: CacheConfig,
    counters: Arc<Counters>,
}

impl RecordCache<InMemoryCacheBackend> {
    /// Convenience constructor wiring an in-memory backend sized from the
    /// config.
    pub fn in_memory(config: CacheConfig) -> Self {
        let backend = Arc::new(InMemoryCacheBackend::new(config.max_entries));
        Self::new(backend, config)
    }
}

impl<B: CacheBackend> RecordCache<B> {
    pub fn new(backend: Arc<B>, config: CacheConfig) -> Self {
        Self {
            backend,
            config,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the cached snapshot if present and younger than the TTL.
    ///
    /// An expired entry is removed and reported as a miss.
    pub async fn get(&self, record_id: &RecordId) -> WardenResult<Option<RecordSnapshot>> {
        if let Some((snapshot, cached_at)) = self.backend.get(record_id).await? {
            let age = Utc::now()
                .signed_duration_since(cached_at)
                .to_std()
                .unwrap_or(Duration::ZERO);

            if age < self.config.entry_ttl {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(snapshot));
            }

            // Expired: drop it so the map does not accumulate dead entries.
            self.backend.delete(record_id).await?;
            debug!(%record_id, age_ms = age.as_millis() as u64, "cached snapshot expired");
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    /// Store a snapshot, resetting its expiry deadline to now + TTL.
    pub async fn put(&self, snapshot: &RecordSnapshot) -> WardenResult<()> {
        self.backend.put(snapshot, Utc::now()).await
    }

    /// Remove an entry immediately. Used after a local write that would
    /// otherwise race with a stale read. Returns whether one was present.
    pub async fn invalidate(&self, record_id: &RecordId) -> WardenResult<bool> {
        debug!(%record_id, "invalidating cached snapshot");
        self.backend.delete(record_id).await
    }

    /// Current usage statistics.
    pub async fn stats(&self) -> WardenResult<CacheStats> {
        Ok(CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            entry_count: self.backend.entry_count().await?,
            evictions: self.backend.evictions().await?,
        })
    }
}

impl<B: CacheBackend> Clone for RecordCache<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
            counters: Arc::clone(&self.counters),
        }
    }
}
