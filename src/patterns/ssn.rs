//! Social security number detection
//!
//! A dash-grouped 3-2-4 digit shape alone is a weak signal (dates, order
//! numbers), so a match is only reported when an SSN keyword appears within
//! a small window around it.

use super::{compile, MessageText, PatternHit, PatternMatcher, ViolationType};
use crate::error::Result;
use regex::Regex;

/// Max distance in bytes between the keyword and the digit group
const CONTEXT_WINDOW: usize = 80;

pub struct SsnMatcher {
    shape: Regex,
    context: Regex,
}

impl SsnMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            shape: compile(r"\b\d{3}[-\s.–—]\d{2}[-\s.–—]\d{4}\b")?,
            context: compile(r"(?i)\b(?:ssn|social[\s-]+security)\b")?,
        })
    }
}

impl PatternMatcher for SsnMatcher {
    fn violation_type(&self) -> ViolationType {
        ViolationType::Ssn
    }

    fn find(&self, text: &MessageText<'_>) -> Result<Vec<PatternHit>> {
        let keywords: Vec<_> = self.context.find_iter(text.original).collect();
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits = Vec::new();
        for m in self.shape.find_iter(text.original) {
            let near = keywords.iter().any(|k| {
                let gap = if k.end() <= m.start() {
                    m.start() - k.end()
                } else if m.end() <= k.start() {
                    k.start() - m.end()
                } else {
                    0
                };
                gap <= CONTEXT_WINDOW
            });
            if near {
                hits.push(PatternHit::original(&m));
            }
        }
        Ok(hits)
    }
}
