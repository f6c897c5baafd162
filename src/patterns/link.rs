//! URL and messaging/meeting link detection
//!
//! `UrlMatcher` flags generic URL and domain-like tokens. `MessagingLinkMatcher`
//! flags links to known chat and meeting providers, tolerating "(dot)"-style
//! obfuscation; those domains also match the generic URL patterns, which is
//! what gives provider links their extra score weight.

use super::{compile, MessageText, PatternHit, PatternMatcher, TextSource, ViolationType};
use crate::error::Result;
use regex::Regex;

/// TLDs accepted for bare-domain matches
const BARE_TLDS: &str = "com|net|org|io|co|me|us|in|ly|app|link|gg|to";

/// Chat and meeting provider domains that bypass the platform channel
const PROVIDER_DOMAINS: &[&str] = &[
    "wa.me",
    "whatsapp.com",
    "t.me",
    "telegram.me",
    "discord.gg",
    "snapchat.com",
    "signal.me",
    "zoom.us",
    "meet.google.com",
    "teams.microsoft.com",
    "webex.com",
    "calendly.com",
];

/// Separator accepted where a dot belongs, covering "(dot)" obfuscations
const DOT_SEP: &str = r"(?:\.|\s*\(dot\)\s*|\s*\[dot\]\s*|\s+dot\s+)";

pub struct UrlMatcher {
    scheme: Regex,
    www: Regex,
    bare_domain: Regex,
    worded_domain: Regex,
}

impl UrlMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scheme: compile(r#"(?i)\bhttps?://[^\s<>"']+"#)?,
            www: compile(r"(?i)\bwww\.[a-z0-9-]+(?:\.[a-z0-9-]+)+(?:/[^\s]*)?")?,
            bare_domain: compile(&format!(
                r"(?i)(?:^|[^@a-z0-9.-])((?:[a-z0-9][a-z0-9-]*\.)+(?:{})\b(?:/[^\s]*)?)",
                BARE_TLDS
            ))?,
            worded_domain: compile(&format!(
                r"(?i)\b[a-z0-9][a-z0-9-]*\s*(?:\(dot\)|\[dot\]|\bdot\b)\s*(?:{})\b",
                BARE_TLDS
            ))?,
        })
    }
}

impl PatternMatcher for UrlMatcher {
    fn violation_type(&self) -> ViolationType {
        ViolationType::UrlLink
    }

    fn find(&self, text: &MessageText<'_>) -> Result<Vec<PatternHit>> {
        let mut hits = Vec::new();
        for (source, haystack) in [
            (TextSource::Original, text.original),
            (TextSource::Normalized, text.normalized.as_str()),
        ] {
            for pattern in [&self.scheme, &self.www, &self.worded_domain] {
                for m in pattern.find_iter(haystack) {
                    hits.push(PatternHit {
                        source,
                        start: m.start(),
                        end: m.end(),
                    });
                }
            }
            for caps in self.bare_domain.captures_iter(haystack) {
                if let Some(m) = caps.get(1) {
                    hits.push(PatternHit {
                        source,
                        start: m.start(),
                        end: m.end(),
                    });
                }
            }
        }
        Ok(hits)
    }
}

pub struct MessagingLinkMatcher {
    providers: Regex,
}

impl MessagingLinkMatcher {
    pub fn new() -> Result<Self> {
        let alternation = PROVIDER_DOMAINS
            .iter()
            .map(|domain| {
                domain
                    .split('.')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(DOT_SEP)
            })
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self {
            providers: compile(&format!(r"(?i)\b(?:{})\b(?:/[^\s]*)?", alternation))?,
        })
    }
}

impl PatternMatcher for MessagingLinkMatcher {
    fn violation_type(&self) -> ViolationType {
        ViolationType::MessagingAppLink
    }

    fn find(&self, text: &MessageText<'_>) -> Result<Vec<PatternHit>> {
        let mut hits = Vec::new();
        for m in self.providers.find_iter(text.original) {
            hits.push(PatternHit::original(&m));
        }
        for m in self.providers.find_iter(text.normalized.as_str()) {
            hits.push(PatternHit::normalized(&m));
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn url_matches(input: &str) -> bool {
        let normalized = normalize(input);
        let text = MessageText {
            original: input,
            normalized: &normalized,
        };
        !UrlMatcher::new().unwrap().find(&text).unwrap().is_empty()
    }

    fn messaging_matches(input: &str) -> bool {
        let normalized = normalize(input);
        let text = MessageText {
            original: input,
            normalized: &normalized,
        };
        !MessagingLinkMatcher::new()
            .unwrap()
            .find(&text)
            .unwrap()
            .is_empty()
    }

    #[test]
    fn test_scheme_url() {
        assert!(url_matches("check https://example.org/page"));
    }

    #[test]
    fn test_www_url() {
        assert!(url_matches("visit www.example.com now"));
    }

    #[test]
    fn test_bare_domain() {
        assert!(url_matches("my site is coolstuff.io"));
    }

    #[test]
    fn test_worded_dot_domain() {
        assert!(url_matches("go to example dot com"));
    }

    #[test]
    fn test_email_domain_not_url() {
        assert!(!url_matches("john@example.com"));
    }

    #[test]
    fn test_prose_not_url() {
        assert!(!url_matches("see you at the appointment tomorrow"));
    }

    #[test]
    fn test_whatsapp_link() {
        assert!(messaging_matches("wa.me/15551234567"));
        assert!(messaging_matches("message me on whatsapp.com"));
    }

    #[test]
    fn test_telegram_link() {
        assert!(messaging_matches("t.me/shadowfox"));
    }

    #[test]
    fn test_meeting_links() {
        assert!(messaging_matches("join meet.google.com/abc-defg-hij"));
        assert!(messaging_matches("zoom.us/j/123456789"));
    }

    #[test]
    fn test_obfuscated_provider() {
        assert!(messaging_matches("join zoom (dot) us tonight"));
        assert!(messaging_matches("zoom dot us slash meeting"));
    }

    #[test]
    fn test_provider_prefix_not_matched_inside_words() {
        assert!(!messaging_matches("the items were sorted"));
        assert!(!messaging_matches("a time of great zoominess"));
    }
}
