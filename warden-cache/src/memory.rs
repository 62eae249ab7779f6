//! In-memory cache backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use warden_core::{CacheError, RecordId, RecordSnapshot, WardenResult};

use crate::traits::CacheBackend;

/// One cached snapshot plus bookkeeping. Never exposed to callers; reads
/// hand out clones of the snapshot.
struct CacheEntry {
    /// Arc so replacement is a pointer swap under the write lock and a
    /// reader holding a clone keeps a coherent snapshot.
    snapshot: Arc<RecordSnapshot>,
    cached_at: DateTime<Utc>,
}

/// Thread-safe in-memory backend.
///
/// A single `RwLock<HashMap>` guards the entries: concurrent reads share
/// the read lock, writes replace the `Arc`'d snapshot atomically. At
/// capacity, inserting a new key evicts the entry with the oldest
/// `cached_at`.
pub struct InMemoryCacheBackend {
    entries: RwLock<HashMap<RecordId, CacheEntry>>,
    max_entries: usize,
    evictions: AtomicU64,
}

impl InMemoryCacheBackend {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
            evictions: AtomicU64::new(0),
        }
    }
}

impl Default for InMemoryCacheBackend {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn get(
        &self,
        record_id: &RecordId,
    ) -> WardenResult<Option<(RecordSnapshot, DateTime<Utc>)>> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries
            .get(record_id)
            .map(|entry| (entry.snapshot.as_ref().clone(), entry.cached_at)))
    }

    async fn put(&self, snapshot: &RecordSnapshot, cached_at: DateTime<Utc>) -> WardenResult<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;

        if !entries.contains_key(&snapshot.record_id) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.cached_at)
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                entries.remove(&id);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(record_id = %id, "evicted oldest entry at capacity");
            }
        }

        entries.insert(
            snapshot.record_id.clone(),
            CacheEntry {
                snapshot: Arc::new(snapshot.clone()),
                cached_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, record_id: &RecordId) -> WardenResult<bool> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.remove(record_id).is_some())
    }

    async fn clear(&self) -> WardenResult<u64> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }

    async fn entry_count(&self) -> WardenResult<u64> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.len() as u64)
    }

    async fn evictions(&self) -> WardenResult<u64> {
        Ok(self.evictions.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: &str, count: u32) -> RecordSnapshot {
        RecordSnapshot::new(RecordId::from(id), count, 5)
    }

    #[tokio::test]
    async fn test_put_then_get_returns_snapshot() {
        let backend = InMemoryCacheBackend::default();
        let cached_at = Utc::now();
        backend.put(&snap("RP-1", 3), cached_at).await.unwrap();

        let (snapshot, at) = backend
            .get(&RecordId::from("RP-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.current_count, 3);
        assert_eq!(at, cached_at);
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let backend = InMemoryCacheBackend::default();
        assert!(backend.get(&RecordId::from("RP-9")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let backend = InMemoryCacheBackend::default();
        backend.put(&snap("RP-1", 3), Utc::now()).await.unwrap();
        backend.put(&snap("RP-1", 4), Utc::now()).await.unwrap();

        let (snapshot, _) = backend
            .get(&RecordId::from("RP-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.current_count, 4);
        assert_eq!(backend.entry_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let backend = InMemoryCacheBackend::new(2);
        let old = Utc::now() - chrono::Duration::seconds(60);
        backend.put(&snap("RP-1", 1), old).await.unwrap();
        backend.put(&snap("RP-2", 2), Utc::now()).await.unwrap();
        backend.put(&snap("RP-3", 3), Utc::now()).await.unwrap();

        assert!(backend.get(&RecordId::from("RP-1")).await.unwrap().is_none());
        assert!(backend.get(&RecordId::from("RP-3")).await.unwrap().is_some());
        assert_eq!(backend.entry_count().await.unwrap(), 2);
        assert_eq!(backend.evictions().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replacing_at_capacity_does_not_evict() {
        let backend = InMemoryCacheBackend::new(1);
        backend.put(&snap("RP-1", 1), Utc::now()).await.unwrap();
        backend.put(&snap("RP-1", 2), Utc::now()).await.unwrap();
        assert_eq!(backend.evictions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let backend = InMemoryCacheBackend::default();
        backend.put(&snap("RP-1", 1), Utc::now()).await.unwrap();
        backend.put(&snap("RP-2", 2), Utc::now()).await.unwrap();

        assert!(backend.delete(&RecordId::from("RP-1")).await.unwrap());
        assert!(!backend.delete(&RecordId::from("RP-1")).await.unwrap());
        assert_eq!(backend.clear().await.unwrap(), 1);
        assert_eq!(backend.entry_count().await.unwrap(), 0);
    }
}
