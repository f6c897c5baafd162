//! Payment identifier detection
//!
//! Known shapes only: UPI-style id@bank, paypal.me / cash.app profile links,
//! and venmo handle mentions.

use super::{compile, MessageText, PatternHit, PatternMatcher, ViolationType};
use crate::error::Result;
use regex::Regex;

/// UPI handle suffixes seen on Indian payment apps
const UPI_PROVIDERS: &str =
    "paytm|phonepe|gpay|upi|ybl|ibl|axl|apl|okaxis|oksbi|okhdfcbank|okicici";

pub struct PaymentMatcher {
    patterns: Vec<Regex>,
}

impl PaymentMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: vec![
                compile(&format!(
                    r"(?i)\b[a-z0-9][a-z0-9._-]+@(?:{})\b",
                    UPI_PROVIDERS
                ))?,
                compile(r"(?i)\bpaypal\.me/[a-z0-9_-]{3,}")?,
                compile(r"(?i)\bcash\.app/\$?[a-z0-9_-]{3,}")?,
                compile(r"(?i)\bvenmo\.com/[a-z0-9_-]{3,}")?,
                compile(r"(?i)\bvenmo\b[\s:]*@[a-z0-9_-]{3,}")?,
            ],
        })
    }
}

impl PatternMatcher for PaymentMatcher {
    fn violation_type(&self) -> ViolationType {
        ViolationType::PaymentId
    }

    fn find(&self, text: &MessageText<'_>) -> Result<Vec<PatternHit>> {
        let mut hits = Vec::new();
        for pattern in &self.patterns {
            for m in pattern.find_iter(text.original) {
                hits.push(PatternHit::original(&m));
            }
            for m in pattern.find_iter(text.normalized.as_str()) {
                hits.push(PatternHit::normalized(&m));
            }
        }
        Ok(hits)
    }
}
