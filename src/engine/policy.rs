//! Decision policy
//!
//! Pure mapping from the detection outcome to allow / mask-offered / blocked.
//! The same inputs always produce the same decision so client-side pre-checks
//! can mirror server behavior exactly.

use super::Violation;
use serde::{Deserialize, Serialize};

/// Outcome of the decision policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// No violations found
    Allow,
    /// Violations present but below the blocking threshold; the caller may
    /// offer the masked variant
    MaskOffered,
    /// Threshold met or an always-block category present
    Blocked,
}

/// Display-only confidence bucket derived from the severity score,
/// independent of the block decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Map the detection outcome to a decision. `threshold_met` already folds in
/// the active profile's always-block set.
pub fn decide(violations: &[Violation], threshold_met: bool) -> Decision {
    if violations.is_empty() {
        Decision::Allow
    } else if threshold_met {
        Decision::Blocked
    } else {
        Decision::MaskOffered
    }
}

/// Confidence bucket for display
pub fn confidence_bucket(severity_score: u32) -> Confidence {
    if severity_score >= 60 {
        Confidence::High
    } else if severity_score >= 30 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::ViolationType;

    fn violation() -> Violation {
        Violation {
            violation_type: ViolationType::UrlLink,
            pattern: "example.com".to_string(),
            span: 0..11,
        }
    }

    #[test]
    fn test_no_violations_allows() {
        assert_eq!(decide(&[], false), Decision::Allow);
        // threshold flag is irrelevant without violations
        assert_eq!(decide(&[], true), Decision::Allow);
    }

    #[test]
    fn test_threshold_met_blocks() {
        assert_eq!(decide(&[violation()], true), Decision::Blocked);
    }

    #[test]
    fn test_below_threshold_offers_mask() {
        assert_eq!(decide(&[violation()], false), Decision::MaskOffered);
    }

    #[test]
    fn test_decision_is_deterministic() {
        let v = vec![violation()];
        for _ in 0..10 {
            assert_eq!(decide(&v, false), decide(&v, false));
        }
    }

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(confidence_bucket(0), Confidence::Low);
        assert_eq!(confidence_bucket(29), Confidence::Low);
        assert_eq!(confidence_bucket(30), Confidence::Medium);
        assert_eq!(confidence_bucket(59), Confidence::Medium);
        assert_eq!(confidence_bucket(60), Confidence::High);
        assert_eq!(confidence_bucket(100), Confidence::High);
    }
}
