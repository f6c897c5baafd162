//! Phone number detection
//!
//! Works on the normalized text, where the normalizer has already collapsed
//! spaced, dashed, and spelled-out digit sequences into contiguous runs.

use super::{compile, MessageText, PatternHit, PatternMatcher, ViolationType};
use crate::error::Result;
use regex::Regex;

/// Digit-run bounds for a plausible phone number
const MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 15;

/// Detects 7-15 digit runs with an optional country-code prefix
pub struct PhoneMatcher {
    digit_run: Regex,
}

impl PhoneMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // Maximal runs; length is filtered below so 16+ digit
            // sequences (card numbers) are not reported as phones
            digit_run: compile(r"\+?\d+")?,
        })
    }
}

impl PatternMatcher for PhoneMatcher {
    fn violation_type(&self) -> ViolationType {
        ViolationType::PhoneNumber
    }

    fn find(&self, text: &MessageText<'_>) -> Result<Vec<PatternHit>> {
        let mut hits = Vec::new();
        for m in self.digit_run.find_iter(text.normalized.as_str()) {
            let digits = m.as_str().chars().filter(|c| c.is_ascii_digit()).count();
            if (MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
                hits.push(PatternHit::normalized(&m));
            }
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn find(input: &str) -> Vec<String> {
        let normalized = normalize(input);
        let text = MessageText {
            original: input,
            normalized: &normalized,
        };
        PhoneMatcher::new()
            .unwrap()
            .find(&text)
            .unwrap()
            .iter()
            .map(|h| normalized.as_str()[h.start..h.end].to_string())
            .collect()
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(find("call 5551234567 now"), vec!["5551234567"]);
    }

    #[test]
    fn test_spaced_number() {
        assert_eq!(find("9 8 7 6 5 4 3 2 1 0"), vec!["9876543210"]);
    }

    #[test]
    fn test_dashed_number() {
        assert_eq!(find("987-654-3210"), vec!["9876543210"]);
    }

    #[test]
    fn test_country_code_prefix() {
        assert_eq!(find("+1 555 123 4567"), vec!["+15551234567"]);
    }

    #[test]
    fn test_word_numbers() {
        assert_eq!(
            find("nine eight seven six five four three two one zero"),
            vec!["9876543210"]
        );
    }

    #[test]
    fn test_short_run_ignored() {
        assert!(find("I scored 9 out of 10").is_empty());
        assert!(find("order 123456").is_empty());
    }

    #[test]
    fn test_card_length_run_ignored() {
        assert!(find("4111111111111111").is_empty());
    }
}
