//! Pure limit-check decision logic.

use crate::snapshot::RecordSnapshot;
use crate::verdict::VerificationResult;

/// The compliance decision: may one more unit be added against the limit?
///
/// Deterministic and free of I/O so it is testable without mocks. A fetched
/// count already at or above the limit is a valid, representable state
/// (`LimitReached`) rather than a data-consistency fault: concurrent writers
/// elsewhere can legitimately produce it.
pub struct ComplianceChecker;

impl ComplianceChecker {
    /// Evaluate a snapshot. Allowed iff `current_count < limit`.
    pub fn evaluate(snapshot: RecordSnapshot) -> VerificationResult {
        if snapshot.is_within_limit() {
            VerificationResult::allowed(snapshot)
        } else {
            VerificationResult::limit_reached(snapshot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RecordId;
    use crate::verdict::VerdictReason;
    use proptest::prelude::*;

    fn snap(count: u32, limit: u32) -> RecordSnapshot {
        RecordSnapshot::new(RecordId::from("RP-1"), count, limit)
    }

    #[test]
    fn test_under_limit_is_allowed() {
        let result = ComplianceChecker::evaluate(snap(3, 5));
        assert!(result.allowed);
        assert_eq!(result.reason, VerdictReason::Ok);
    }

    #[test]
    fn test_at_limit_is_denied() {
        let result = ComplianceChecker::evaluate(snap(5, 5));
        assert!(!result.allowed);
        assert_eq!(result.reason, VerdictReason::LimitReached);
    }

    #[test]
    fn test_over_limit_is_denied_not_an_error() {
        // Concurrent writers elsewhere can push the count past the limit
        // between fetches. That is a deny, not a fault.
        let result = ComplianceChecker::evaluate(snap(7, 5));
        assert!(!result.allowed);
        assert_eq!(result.reason, VerdictReason::LimitReached);
    }

    #[test]
    fn test_zero_limit_denies_everything() {
        let result = ComplianceChecker::evaluate(snap(0, 0));
        assert!(!result.allowed);
    }

    #[test]
    fn test_verdict_keeps_the_snapshot() {
        let result = ComplianceChecker::evaluate(snap(3, 5));
        let used = result.snapshot.unwrap();
        assert_eq!(used.current_count, 3);
        assert_eq!(used.limit, 5);
    }

    proptest! {
        #[test]
        fn prop_count_below_limit_is_always_allowed(
            count in 0u32..10_000,
            headroom in 1u32..10_000,
        ) {
            let result = ComplianceChecker::evaluate(snap(count, count + headroom));
            prop_assert!(result.allowed);
            prop_assert_eq!(result.reason, VerdictReason::Ok);
        }

        #[test]
        fn prop_count_at_or_above_limit_is_always_denied(
            limit in 0u32..10_000,
            overshoot in 0u32..10_000,
        ) {
            let result = ComplianceChecker::evaluate(snap(limit + overshoot, limit));
            prop_assert!(!result.allowed);
            prop_assert_eq!(result.reason, VerdictReason::LimitReached);
        }
    }
}
