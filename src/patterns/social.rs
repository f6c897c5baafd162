//! Social media handle detection
//!
//! Catches "@"-prefixed handles and platform-name + handle pairs. The handle
//! pattern deliberately excludes the domain half of an email address by
//! requiring the '@' not to follow an email local-part character.

use super::{compile, MessageText, PatternHit, PatternMatcher, TextSource, ViolationType};
use crate::error::Result;
use regex::Regex;

pub struct SocialHandleMatcher {
    handle: Regex,
    platform_pair: Regex,
}

impl SocialHandleMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            handle: compile(r"(?i)(?:^|[^a-z0-9._%+-])(@[a-z0-9_][a-z0-9_.]{2,})")?,
            platform_pair: compile(
                r"(?i)\b(?:instagram|insta|telegram|discord|snapchat|snap|twitter|tiktok)\b[\s:]+(?:me\s+)?@?([a-z0-9_.]{3,})",
            )?,
        })
    }
}

impl PatternMatcher for SocialHandleMatcher {
    fn violation_type(&self) -> ViolationType {
        ViolationType::SocialHandle
    }

    fn find(&self, text: &MessageText<'_>) -> Result<Vec<PatternHit>> {
        let mut hits = Vec::new();

        for caps in self.handle.captures_iter(text.original) {
            if let Some(m) = caps.get(1) {
                // Trailing dots are sentence punctuation, not handle chars
                let trimmed = m.as_str().trim_end_matches('.');
                hits.push(PatternHit {
                    source: TextSource::Original,
                    start: m.start(),
                    end: m.start() + trimmed.len(),
                });
            }
        }

        for caps in self.platform_pair.captures_iter(text.original) {
            let Some(token) = caps.get(1) else { continue };
            // A bare dictionary word after a platform name is usually prose;
            // require handle-shaped tokens (digit, underscore, or dot)
            let handle_like = token
                .as_str()
                .chars()
                .any(|c| c.is_ascii_digit() || c == '_' || c == '.');
            let at_prefixed = text.original[..token.start()].ends_with('@');
            if handle_like || at_prefixed {
                if let Some(m) = caps.get(0) {
                    hits.push(PatternHit::original(&m));
                }
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
        SocialHandleMatcher::new()
            .unwrap()
            .find(&text)
            .unwrap()
            .iter()
            .map(|h| input[h.start..h.end].to_string())
            .collect()
    }

    #[test]
    fn test_at_prefixed_handle() {
        assert_eq!(find("add me @insta_user123"), vec!["@insta_user123"]);
    }

    #[test]
    fn test_trailing_punctuation_trimmed() {
        assert_eq!(find("follow @cooluser."), vec!["@cooluser"]);
    }

    #[test]
    fn test_platform_pair() {
        assert_eq!(
            find("find me on telegram: shadow_fox99"),
            vec!["telegram: shadow_fox99"]
        );
    }

    #[test]
    fn test_email_domain_not_a_handle() {
        assert!(find("mail john@example.com today").is_empty());
    }

    #[test]
    fn test_platform_followed_by_prose_ignored() {
        assert!(find("the discord server is busy").is_empty());
    }

    #[test]
    fn test_short_at_token_ignored() {
        assert!(find("@ no handle here").is_empty());
        assert!(find("email me @ home").is_empty());
    }
}
