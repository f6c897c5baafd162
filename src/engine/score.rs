//! Severity scoring and threshold evaluation
//!
//! The score is a weighted sum over detected violations with diminishing
//! weight for repeats inside the same category. The threshold check compares
//! the matched-character share of the normalized text against the active
//! sensitivity profile; a share exactly at the threshold counts as met.

use super::Violation;
use crate::config::SensitivityProfile;
use crate::normalize::NormalizedText;
use crate::patterns::ViolationType;
use std::collections::HashMap;

/// Severity scores are clamped to this ceiling
pub const MAX_SCORE: u32 = 100;

/// Weighted severity over all violations. The first occurrence of a category
/// counts its full weight, each repeat half of the previous one, so the score
/// never decreases when a distinct category is added.
pub fn severity_score(violations: &[Violation]) -> u32 {
    let mut repeats: HashMap<ViolationType, u32> = HashMap::new();
    let mut score: u32 = 0;
    for violation in violations {
        let n = repeats.entry(violation.violation_type).or_insert(0);
        score += violation.violation_type.base_weight() >> *n;
        *n = (*n + 1).min(31);
    }
    score.min(MAX_SCORE)
}

/// True when any always-block category is present, or the matched-character
/// percentage of the normalized text is at or above the profile threshold
pub fn threshold_met(
    violations: &[Violation],
    normalized: &NormalizedText,
    profile: &SensitivityProfile,
) -> bool {
    if violations.is_empty() {
        return false;
    }
    if violations
        .iter()
        .any(|v| profile.always_blocks(v.violation_type))
    {
        return true;
    }
    let total = normalized.char_count();
    if total == 0 {
        return false;
    }
    let matched: usize = violations.iter().map(|v| v.pattern.chars().count()).sum();
    let percentage = matched as f64 * 100.0 / total as f64;
    percentage >= profile.threshold_percentage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensitivityProfiles;
    use crate::config::Sensitivity;
    use crate::normalize::normalize;

    fn violation(ty: ViolationType, pattern: &str) -> Violation {
        Violation {
            violation_type: ty,
            pattern: pattern.to_string(),
            span: 0..pattern.len(),
        }
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(severity_score(&[]), 0);
    }

    #[test]
    fn test_single_violation_uses_base_weight() {
        let v = vec![violation(ViolationType::PhoneNumber, "5551234567")];
        assert_eq!(severity_score(&v), 25);
    }

    #[test]
    fn test_repeats_diminish() {
        let v = vec![
            violation(ViolationType::PhoneNumber, "5551234567"),
            violation(ViolationType::PhoneNumber, "5559876543"),
            violation(ViolationType::PhoneNumber, "5551112222"),
        ];
        // 25 + 12 + 6
        assert_eq!(severity_score(&v), 43);
    }

    #[test]
    fn test_distinct_category_never_decreases_score() {
        let mut violations = vec![violation(ViolationType::UrlLink, "example.com")];
        let base = severity_score(&violations);
        violations.push(violation(ViolationType::EmailAddress, "a@b.com"));
        assert!(severity_score(&violations) >= base);
    }

    #[test]
    fn test_score_clamped_to_ceiling() {
        let v = vec![
            violation(ViolationType::PhoneNumber, "5551234567"),
            violation(ViolationType::EmailAddress, "a@b.com"),
            violation(ViolationType::PaymentId, "a@paytm"),
            violation(ViolationType::Ssn, "123-45-6789"),
            violation(ViolationType::MessagingAppLink, "wa.me/1"),
        ];
        assert_eq!(severity_score(&v), MAX_SCORE);
    }

    #[test]
    fn test_threshold_empty_is_not_met() {
        let profiles = SensitivityProfiles::default();
        let normalized = normalize("hello there");
        assert!(!threshold_met(
            &[],
            &normalized,
            profiles.active(Sensitivity::High)
        ));
    }

    #[test]
    fn test_threshold_exact_boundary_counts_as_met() {
        let profiles = SensitivityProfiles::default();
        // 2 matched chars of 10 normalized chars = exactly 20%
        let normalized = normalize("aaaaaaaaaa");
        assert_eq!(normalized.char_count(), 10);
        let v = vec![violation(ViolationType::UrlLink, "ab")];
        assert!(threshold_met(
            &v,
            &normalized,
            profiles.active(Sensitivity::Medium)
        ));
    }

    #[test]
    fn test_threshold_just_below_not_met() {
        let profiles = SensitivityProfiles::default();
        let normalized = normalize("aaaaaaaaaa");
        let v = vec![violation(ViolationType::UrlLink, "a")];
        assert!(!threshold_met(
            &v,
            &normalized,
            profiles.active(Sensitivity::Medium)
        ));
    }

    #[test]
    fn test_always_block_overrides_density() {
        let profiles = SensitivityProfiles::default();
        let normalized = normalize(&format!("{} a@b.com", "filler words ".repeat(30)));
        let v = vec![violation(ViolationType::EmailAddress, "a@b.com")];
        assert!(threshold_met(
            &v,
            &normalized,
            profiles.active(Sensitivity::High)
        ));
        assert!(!threshold_met(
            &v,
            &normalized,
            profiles.active(Sensitivity::Medium)
        ));
    }
}
