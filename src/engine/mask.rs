//! Masking transform
//!
//! Replaces matched spans in the original text with category placeholders.
//! Overlaps are resolved longest-match-first, left to right, with greedy
//! non-overlapping replacement; replacements are applied right to left so
//! earlier offsets stay valid. After the first pass the engine re-detects on
//! the masked text and masks any residual hits, which holds the fixed point:
//! re-running detection on `masked_text` never re-triggers a detector.

use super::{DetectorEngine, Violation};
use crate::normalize::normalize;
use crate::patterns::ViolationType;
use std::ops::Range;

/// Fallback placeholder for spans without a specific category
pub const GENERIC_PLACEHOLDER: &str = "[PII_REDACTED]";

/// Bounded residual sweeps after the first pass
const RESIDUAL_PASSES: usize = 2;

/// Mask every detected span in `original`
pub fn mask(original: &str, violations: &[Violation], engine: &DetectorEngine) -> String {
    if violations.is_empty() {
        return original.to_string();
    }
    let mut masked = apply(original, violations);
    for _ in 0..RESIDUAL_PASSES {
        let normalized = normalize(&masked);
        let residual = engine.detect(&masked, &normalized);
        if residual.is_empty() {
            break;
        }
        masked = apply(&masked, &residual);
    }
    masked
}

fn apply(text: &str, violations: &[Violation]) -> String {
    let mut candidates: Vec<(Range<usize>, ViolationType)> = violations
        .iter()
        .map(|v| (v.span.clone(), v.violation_type))
        .collect();
    // Longest first, then left to right
    candidates.sort_by(|a, b| {
        (b.0.end - b.0.start)
            .cmp(&(a.0.end - a.0.start))
            .then(a.0.start.cmp(&b.0.start))
    });

    let mut chosen: Vec<(Range<usize>, ViolationType)> = Vec::new();
    for (span, ty) in candidates {
        if span.end > text.len() {
            continue;
        }
        let overlaps = chosen
            .iter()
            .any(|(kept, _)| span.start < kept.end && kept.start < span.end);
        if !overlaps {
            chosen.push((span, ty));
        }
    }

    chosen.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut result = text.to_string();
    for (span, ty) in chosen {
        result.replace_range(span, ty.placeholder());
    }
    result
}
