//! Email address detection
//!
//! Matches the plain local@domain.tld shape in the original text, and a
//! separator-tolerant variant in the normalized text that survives worded
//! "at"/"dot" substitutions rewritten by the normalizer.

use super::{compile, MessageText, PatternHit, PatternMatcher, ViolationType};
use crate::error::Result;
use regex::Regex;

pub struct EmailMatcher {
    plain: Regex,
    tolerant: Regex,
}

impl EmailMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            plain: compile(r"(?i)[a-z0-9][a-z0-9._%+-]*@[a-z0-9][a-z0-9.-]*\.[a-z]{2,}")?,
            // Spaces and brackets tolerated around '@' and '.' so that
            // "john [@] gmail [.] com" still reads as one address
            tolerant: compile(
                r"[a-z0-9][a-z0-9._%+-]*[\s\[\]()]*@[\s\[\]()]*(?:[a-z0-9-]+[\s\[\]()]*\.[\s\[\]()]*)+[a-z]{2,}",
            )?,
        })
    }
}

impl PatternMatcher for EmailMatcher {
    fn violation_type(&self) -> ViolationType {
        ViolationType::EmailAddress
    }

    fn find(&self, text: &MessageText<'_>) -> Result<Vec<PatternHit>> {
        let mut hits = Vec::new();
        for m in self.plain.find_iter(text.original) {
            hits.push(PatternHit::original(&m));
        }
        for m in self.tolerant.find_iter(text.normalized.as_str()) {
            hits.push(PatternHit::normalized(&m));
        }
        Ok(hits)
    }
}
