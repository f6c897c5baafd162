//! ChatShield configuration management

use crate::patterns::ViolationType;
use serde::{Deserialize, Serialize};

/// Main ChatShield configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Detection engine configuration
    pub detection: DetectionConfig,

    /// Violation rate-limit reporting configuration
    pub rate_limit: RateLimitConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS ("*" allows any)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18590,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Detection sensitivity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    /// Only block the most clear-cut contact sharing
    Low,

    /// Block dense contact sharing and high-risk categories
    Medium,

    /// Block on any high-risk category (default)
    #[default]
    High,
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown sensitivity: {}", other)),
        }
    }
}

/// Detection engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Sensitivity applied when a request does not specify one
    pub default_sensitivity: Sensitivity,

    /// Input longer than this many characters is truncated, never rejected
    pub max_text_chars: usize,

    /// Per-level sensitivity profiles
    pub profiles: SensitivityProfiles,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            default_sensitivity: Sensitivity::High,
            max_text_chars: 10_000,
            profiles: SensitivityProfiles::default(),
        }
    }
}

/// The three deployment-tunable sensitivity profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityProfiles {
    pub low: SensitivityProfile,
    pub medium: SensitivityProfile,
    pub high: SensitivityProfile,
}

impl SensitivityProfiles {
    /// Profile active for the given sensitivity level
    pub fn active(&self, sensitivity: Sensitivity) -> &SensitivityProfile {
        match sensitivity {
            Sensitivity::Low => &self.low,
            Sensitivity::Medium => &self.medium,
            Sensitivity::High => &self.high,
        }
    }
}

impl Default for SensitivityProfiles {
    fn default() -> Self {
        Self {
            low: SensitivityProfile {
                threshold_percentage: 35.0,
                always_block: vec![ViolationType::Ssn],
            },
            medium: SensitivityProfile {
                threshold_percentage: 20.0,
                always_block: vec![ViolationType::PaymentId, ViolationType::Ssn],
            },
            high: SensitivityProfile {
                threshold_percentage: 20.0,
                always_block: vec![
                    ViolationType::PhoneNumber,
                    ViolationType::EmailAddress,
                    ViolationType::PaymentId,
                    ViolationType::MessagingAppLink,
                    ViolationType::Ssn,
                ],
            },
        }
    }
}

/// Threshold and always-block set for one sensitivity level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityProfile {
    /// Matched-character percentage of the normalized text at or above
    /// which the detection threshold is met
    pub threshold_percentage: f64,

    /// Categories that force a block regardless of the threshold
    pub always_block: Vec<ViolationType>,
}

impl SensitivityProfile {
    /// Whether a category is in this profile's always-block set
    pub fn always_blocks(&self, violation_type: ViolationType) -> bool {
        self.always_block.contains(&violation_type)
    }
}

/// Violation rate-limit reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Sliding window length in minutes
    pub window_minutes: u64,

    /// Block events above which a user is reported as rate limited
    pub max_violations: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_minutes: 60,
            max_violations: 3,
        }
    }
}
