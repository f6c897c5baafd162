//! Pattern library for contact-information detection
//!
//! One independent matcher per violation category behind the shared
//! [`PatternMatcher`] trait. The detector engine iterates the registry in
//! declaration order, so category ordering in results is fixed by the
//! [`ViolationType`] enum. New categories are added here without touching
//! scoring or masking.

pub mod email;
pub mod link;
pub mod payment;
pub mod phone;
pub mod social;
pub mod ssn;

use crate::error::Result;
use crate::normalize::NormalizedText;
use serde::{Deserialize, Serialize};

pub use email::EmailMatcher;
pub use link::{MessagingLinkMatcher, UrlMatcher};
pub use payment::PaymentMatcher;
pub use phone::PhoneMatcher;
pub use social::SocialHandleMatcher;
pub use ssn::SsnMatcher;

/// Violation categories, in fixed declaration order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    PhoneNumber,
    EmailAddress,
    SocialHandle,
    PaymentId,
    UrlLink,
    MessagingAppLink,
    Ssn,
}

impl ViolationType {
    /// Mask placeholder for this category
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::PhoneNumber => "[PHONE_REDACTED]",
            Self::EmailAddress => "[EMAIL_REDACTED]",
            Self::SocialHandle => "[HANDLE_REDACTED]",
            Self::PaymentId => "[PAYMENT_REDACTED]",
            Self::UrlLink | Self::MessagingAppLink => "[LINK_REDACTED]",
            Self::Ssn => "[SSN_REDACTED]",
        }
    }

    /// Base severity weight of the first occurrence in this category
    pub fn base_weight(&self) -> u32 {
        match self {
            Self::PhoneNumber => 25,
            Self::EmailAddress => 20,
            Self::SocialHandle => 15,
            Self::PaymentId => 25,
            Self::UrlLink => 15,
            Self::MessagingAppLink => 20,
            Self::Ssn => 30,
        }
    }
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PhoneNumber => write!(f, "phone_number"),
            Self::EmailAddress => write!(f, "email_address"),
            Self::SocialHandle => write!(f, "social_handle"),
            Self::PaymentId => write!(f, "payment_id"),
            Self::UrlLink => write!(f, "url_link"),
            Self::MessagingAppLink => write!(f, "messaging_app_link"),
            Self::Ssn => write!(f, "ssn"),
        }
    }
}

/// Which text a hit's byte range refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Original,
    Normalized,
}

/// A raw match produced by a single matcher
#[derive(Debug, Clone)]
pub struct PatternHit {
    pub source: TextSource,
    pub start: usize,
    pub end: usize,
}

impl PatternHit {
    pub fn original(m: &regex::Match<'_>) -> Self {
        Self {
            source: TextSource::Original,
            start: m.start(),
            end: m.end(),
        }
    }

    pub fn normalized(m: &regex::Match<'_>) -> Self {
        Self {
            source: TextSource::Normalized,
            start: m.start(),
            end: m.end(),
        }
    }
}

/// The two views of a message handed to every matcher
pub struct MessageText<'a> {
    pub original: &'a str,
    pub normalized: &'a NormalizedText,
}

/// Shared capability of all per-category matchers: given both views of the
/// text, return zero or more hits of this category
pub trait PatternMatcher: Send + Sync {
    /// Category this matcher detects
    fn violation_type(&self) -> ViolationType;

    /// Find all hits in either view of the message
    fn find(&self, text: &MessageText<'_>) -> Result<Vec<PatternHit>>;
}

/// Compile a regex, mapping failures into the crate error type
pub(crate) fn compile(pattern: &str) -> Result<regex::Regex> {
    regex::Regex::new(pattern)
        .map_err(|e| crate::error::Error::Pattern(format!("invalid pattern '{}': {}", pattern, e)))
}

/// Build the full matcher registry in category-declaration order
pub fn default_registry() -> Result<Vec<Box<dyn PatternMatcher>>> {
    Ok(vec![
        Box::new(PhoneMatcher::new()?),
        Box::new(EmailMatcher::new()?),
        Box::new(SocialHandleMatcher::new()?),
        Box::new(PaymentMatcher::new()?),
        Box::new(UrlMatcher::new()?),
        Box::new(MessagingLinkMatcher::new()?),
        Box::new(SsnMatcher::new()?),
    ])
}
