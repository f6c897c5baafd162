//! Detector engine
//!
//! Runs the pattern registry against the original and normalized views of a
//! message and produces an ordered, deduplicated violation list. A single
//! category failing is logged and treated as no-match; the remaining
//! categories still run.

pub mod mask;
pub mod policy;
pub mod score;

use crate::error::Result;
use crate::normalize::NormalizedText;
use crate::patterns::{default_registry, MessageText, PatternMatcher, TextSource, ViolationType};
use std::collections::HashSet;
use std::ops::Range;

/// A detected violation. `pattern` is drawn from the original text, so an
/// obfuscated match reports the text the user actually typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub violation_type: ViolationType,
    pub pattern: String,
    /// Byte range of the match in the original text
    pub span: Range<usize>,
}

pub struct DetectorEngine {
    matchers: Vec<Box<dyn PatternMatcher>>,
    max_text_chars: usize,
}

impl DetectorEngine {
    pub fn new(max_text_chars: usize) -> Result<Self> {
        Ok(Self {
            matchers: default_registry()?,
            max_text_chars,
        })
    }

    /// Number of registered category matchers
    pub fn patterns_loaded(&self) -> usize {
        self.matchers.len()
    }

    /// Deterministic char-boundary truncation. Oversized input is a policy
    /// outcome, never an error.
    pub fn truncate<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.max_text_chars) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }

    /// Run every matcher and return violations deduplicated by
    /// (category, canonical match), in category-declaration order then
    /// first-occurrence order. Calling twice on identical input yields an
    /// identical list.
    pub fn detect(&self, original: &str, normalized: &NormalizedText) -> Vec<Violation> {
        let msg = MessageText {
            original,
            normalized,
        };
        let mut seen: HashSet<(ViolationType, String)> = HashSet::new();
        let mut violations = Vec::new();

        for matcher in &self.matchers {
            let ty = matcher.violation_type();
            let hits = match matcher.find(&msg) {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!(
                        category = %ty,
                        error = %e,
                        "matcher failed, category treated as no-match"
                    );
                    continue;
                }
            };

            let spans: Vec<Range<usize>> = hits
                .into_iter()
                .filter_map(|hit| match hit.source {
                    TextSource::Original => Some(hit.start..hit.end),
                    TextSource::Normalized => normalized.map_span(hit.start..hit.end),
                })
                .collect();

            for span in prune_contained(spans) {
                let Some(pattern) = original.get(span.clone()) else {
                    continue;
                };
                let key = canonical_key(pattern);
                if key.is_empty() || !seen.insert((ty, key)) {
                    continue;
                }
                violations.push(Violation {
                    violation_type: ty,
                    pattern: pattern.to_string(),
                    span,
                });
            }
        }
        violations
    }
}

/// Sort spans by position and drop any span fully contained in another, so
/// a matcher with several overlapping patterns reports each region once
fn prune_contained(mut spans: Vec<Range<usize>>) -> Vec<Range<usize>> {
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut kept: Vec<Range<usize>> = Vec::new();
    for span in spans {
        if kept
            .iter()
            .any(|k| k.start <= span.start && span.end <= k.end)
        {
            continue;
        }
        kept.push(span);
    }
    kept
}

/// Canonical form for (category, match) deduplication: lowercase with
/// whitespace and bracket noise removed, so the same address found in the
/// original and the normalized view collapses to one violation
fn canonical_key(pattern: &str) -> String {
    pattern
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '[' | ']' | '(' | ')'))
        .flat_map(char::to_lowercase)
        .collect()
}
