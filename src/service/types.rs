//! Wire types for the moderation API
//!
//! All types use camelCase JSON serialization. Violation categories keep
//! their snake_case names ("phone_number") since those are stable protocol
//! identifiers shared with clients.

use super::{DetectionResult, SystemStats};
use crate::config::Sensitivity;
use crate::engine::policy::Confidence;
use crate::tracker::UserViolations;
use serde::{Deserialize, Serialize};

/// Request body for POST /api/v1/moderation/detect
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub sensitivity: Option<Sensitivity>,
}

/// A single reported violation
#[derive(Debug, Serialize)]
pub struct ViolationItem {
    #[serde(rename = "type")]
    pub violation_type: String,
    pub pattern: String,
}

/// Response body for POST /api/v1/moderation/detect
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    pub is_blocked: bool,
    pub confidence: Confidence,
    pub violation_type: Option<String>,
    pub detected_pattern: Option<String>,
    pub original_text: String,
    pub normalized_text: String,
    pub severity_score: u32,
    pub all_violations: Vec<ViolationItem>,
    pub masked_text: String,
    pub detection_threshold_met: bool,
    pub processing_time_ms: f64,
}

impl From<DetectionResult> for DetectResponse {
    fn from(result: DetectionResult) -> Self {
        Self {
            is_blocked: result.is_blocked,
            confidence: result.confidence,
            violation_type: result.violation_type.map(|t| t.to_string()),
            detected_pattern: result.detected_pattern,
            original_text: result.original_text,
            normalized_text: result.normalized_text,
            severity_score: result.severity_score,
            all_violations: result
                .all_violations
                .into_iter()
                .map(|v| ViolationItem {
                    violation_type: v.violation_type.to_string(),
                    pattern: v.pattern,
                })
                .collect(),
            masked_text: result.masked_text,
            detection_threshold_met: result.detection_threshold_met,
            processing_time_ms: result.processing_time_ms,
        }
    }
}

/// Response body for GET /api/v1/moderation/stats
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub system_info: SystemInfo,
    pub rate_limiting: RateLimitInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub sensitivity: Sensitivity,
    pub patterns_loaded: usize,
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitInfo {
    pub window_minutes: u64,
    pub max_violations: usize,
}

impl From<SystemStats> for StatsResponse {
    fn from(stats: SystemStats) -> Self {
        Self {
            system_info: SystemInfo {
                sensitivity: stats.default_sensitivity,
                patterns_loaded: stats.patterns_loaded,
                version: stats.engine_version,
            },
            rate_limiting: RateLimitInfo {
                window_minutes: stats.rate_limit_window_minutes,
                max_violations: stats.rate_limit_max_violations,
            },
        }
    }
}

/// Response body for GET /api/v1/moderation/users/:user_id/violations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserViolationsResponse {
    pub user_id: String,
    pub violation_count: usize,
    pub is_rate_limited: bool,
    pub window_minutes: u64,
}

impl From<UserViolations> for UserViolationsResponse {
    fn from(status: UserViolations) -> Self {
        Self {
            user_id: status.user_id,
            violation_count: status.violation_count,
            is_rate_limited: status.is_rate_limited,
            window_minutes: status.window_minutes,
        }
    }
}
