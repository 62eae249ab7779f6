//! Compliance verdicts returned to callers.

use crate::snapshot::RecordSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a compliance check allowed or denied the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictReason {
    /// Headroom remains under the limit.
    Ok,
    /// The count has reached or exceeded the limit.
    LimitReached,
    /// The authority does not know the record.
    RecordNotFound,
    /// The authority could not be consulted; WARDEN fails closed.
    AuthorityUnreachable,
}

impl fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerdictReason::Ok => "ok",
            VerdictReason::LimitReached => "limit reached",
            VerdictReason::RecordNotFound => "record not found",
            VerdictReason::AuthorityUnreachable => "authority unreachable",
        };
        f.write_str(s)
    }
}

/// Outcome of one compliance check.
///
/// Created fresh per call and immutable afterwards. `snapshot` is the state
/// the decision was based on; it is absent when no snapshot could be obtained
/// (`RecordNotFound`, `AuthorityUnreachable`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether adding one more unit is allowed.
    pub allowed: bool,
    /// Why the check reached this verdict.
    pub reason: VerdictReason,
    /// The snapshot the decision used, if any.
    pub snapshot: Option<RecordSnapshot>,
}

impl VerificationResult {
    /// Allow: the snapshot shows headroom under the limit.
    pub fn allowed(snapshot: RecordSnapshot) -> Self {
        Self {
            allowed: true,
            reason: VerdictReason::Ok,
            snapshot: Some(snapshot),
        }
    }

    /// Deny: the snapshot shows the limit has been reached.
    pub fn limit_reached(snapshot: RecordSnapshot) -> Self {
        Self {
            allowed: false,
            reason: VerdictReason::LimitReached,
            snapshot: Some(snapshot),
        }
    }

    /// Deny: the record is unknown to the authority.
    pub fn record_not_found() -> Self {
        Self {
            allowed: false,
            reason: VerdictReason::RecordNotFound,
            snapshot: None,
        }
    }

    /// Deny: the authority could not be consulted after retries.
    pub fn authority_unreachable() -> Self {
        Self {
            allowed: false,
            reason: VerdictReason::AuthorityUnreachable,
            snapshot: None,
        }
    }

    /// Whether the check allowed the operation.
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RecordId;

    fn snap(count: u32, limit: u32) -> RecordSnapshot {
        RecordSnapshot::new(RecordId::from("RP-1"), count, limit)
    }

    #[test]
    fn test_allowed_carries_snapshot() {
        let result = VerificationResult::allowed(snap(3, 5));
        assert!(result.is_allowed());
        assert_eq!(result.reason, VerdictReason::Ok);
        assert_eq!(result.snapshot.unwrap().current_count, 3);
    }

    #[test]
    fn test_limit_reached_denies_with_snapshot() {
        let result = VerificationResult::limit_reached(snap(5, 5));
        assert!(!result.is_allowed());
        assert_eq!(result.reason, VerdictReason::LimitReached);
        assert!(result.snapshot.is_some());
    }

    #[test]
    fn test_failure_verdicts_have_no_snapshot() {
        let not_found = VerificationResult::record_not_found();
        assert!(!not_found.is_allowed());
        assert_eq!(not_found.reason, VerdictReason::RecordNotFound);
        assert!(not_found.snapshot.is_none());

        let unreachable = VerificationResult::authority_unreachable();
        assert!(!unreachable.is_allowed());
        assert_eq!(unreachable.reason, VerdictReason::AuthorityUnreachable);
        assert!(unreachable.snapshot.is_none());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(VerdictReason::Ok.to_string(), "ok");
        assert_eq!(
            VerdictReason::AuthorityUnreachable.to_string(),
            "authority unreachable"
        );
    }
}
