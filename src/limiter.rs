// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pure admission decision for registration attempts.
//!
//! Stateless: the caller supplies the current count and the configured
//! limit, so the decision is deterministic and needs no wall clock.

use crate::store::RecordId;

/// Outcome of a registration attempt.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    /// Attempt accepted and durably recorded
    Accepted {
        /// Record written for this attempt
        recorded: RecordId,
        /// Accepted attempts left for this identifier today
        remaining: i64,
    },
    /// Attempt rejected
    Rejected {
        /// Reason for rejection
        reason: RejectReason,
    },
}

/// Reason a registration attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Identifier reached its daily registration limit
    DailyLimitReached,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DailyLimitReached => write!(f, "registration limit reached"),
        }
    }
}

/// Whether an identifier with `current_count` accepted registrations
/// today is at or past `daily_limit`.
///
/// A limit of zero rejects every attempt, including the first; negative
/// limits are treated as zero, never as unbounded.
pub fn is_over_limit(current_count: i64, daily_limit: i64) -> bool {
    current_count >= daily_limit.max(0)
}

/// Accepted attempts left after this one, floored at zero.
pub fn remaining_after(current_count: i64, daily_limit: i64) -> i64 {
    (daily_limit.max(0) - current_count - 1).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixth_attempt_is_first_rejection_at_default_limit() {
        for count in 0..5 {
            assert!(!is_over_limit(count, 5), "count {count} should pass");
        }
        assert!(is_over_limit(5, 5));
    }

    #[test]
    fn zero_limit_rejects_first_attempt() {
        assert!(is_over_limit(0, 0));
    }

    #[test]
    fn negative_limit_is_treated_as_zero() {
        assert!(is_over_limit(0, -3));
        assert!(is_over_limit(100, -3));
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        assert_eq!(remaining_after(0, 5), 4);
        assert_eq!(remaining_after(4, 5), 0);
        assert_eq!(remaining_after(0, 0), 0);
    }
}
