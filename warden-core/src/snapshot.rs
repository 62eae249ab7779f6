//! Record identity and point-in-time snapshots of remotely-owned state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a record owned by the remote authority.
///
/// Record ids are opaque strings assigned by the authority (e.g. `"RP-1"`).
/// WARDEN never interprets them beyond equality and hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a record id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A point-in-time view of a remotely-owned resource.
///
/// `current_count` and `limit` are only ever written together, from a single
/// successful remote fetch. Snapshots are immutable: a newer fetch produces a
/// replacement, never an in-place update. This is what lets the cache swap
/// entries atomically without readers observing a half-written state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Identity of the record at the authority.
    pub record_id: RecordId,
    /// Number of units currently allocated against the limit.
    pub current_count: u32,
    /// Hard ceiling on the number of units.
    pub limit: u32,
    /// When this snapshot was fetched from the authority.
    pub fetched_at: DateTime<Utc>,
}

impl RecordSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(record_id: RecordId, current_count: u32, limit: u32) -> Self {
        Self {
            record_id,
            current_count,
            limit,
            fetched_at: Utc::now(),
        }
    }

    /// Units still available before the limit is reached.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.current_count)
    }

    /// Whether one more unit could be added without exceeding the limit.
    pub fn is_within_limit(&self) -> bool {
        self.current_count < self.limit
    }
}
