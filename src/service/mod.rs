//! Service facade for the moderation engine
//!
//! Wires the pipeline in data-flow order: text → normalizer → detector
//! engine → {scorer, masker} → decision policy → violation tracker →
//! response. `detect` always returns a result; bookkeeping failures are
//! logged and never surfaced to the caller.

pub mod handler;
pub mod types;

use crate::config::{Sensitivity, ShieldConfig};
use crate::engine::policy::{self, Confidence, Decision};
use crate::engine::{mask, score, DetectorEngine, Violation};
use crate::error::Result;
use crate::normalize;
use crate::patterns::ViolationType;
use crate::tracker::{InMemoryTracker, UserViolations, ViolationStore};
use std::sync::Arc;
use std::time::Instant;

/// A moderation request
#[derive(Debug, Clone)]
pub struct DetectionRequest {
    pub text: String,
    pub user_id: Option<String>,
    pub sensitivity: Option<Sensitivity>,
}

/// Stateless result of one detection call, computed fresh per call
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub is_blocked: bool,
    pub confidence: Confidence,
    pub violation_type: Option<ViolationType>,
    pub detected_pattern: Option<String>,
    pub original_text: String,
    pub normalized_text: String,
    pub severity_score: u32,
    pub all_violations: Vec<Violation>,
    pub masked_text: String,
    pub detection_threshold_met: bool,
    pub processing_time_ms: f64,
}

/// Aggregate engine information, no per-request identifiers
#[derive(Debug, Clone)]
pub struct SystemStats {
    pub patterns_loaded: usize,
    pub default_sensitivity: Sensitivity,
    pub engine_version: String,
    pub rate_limit_window_minutes: u64,
    pub rate_limit_max_violations: usize,
}

/// The external surface of the moderation engine
pub struct ModerationService {
    config: ShieldConfig,
    engine: DetectorEngine,
    tracker: Arc<dyn ViolationStore>,
}

impl ModerationService {
    pub fn new(config: ShieldConfig) -> Result<Self> {
        let tracker = Arc::new(InMemoryTracker::new(&config.rate_limit));
        Self::with_store(config, tracker)
    }

    /// Build with an alternative tracker backing, e.g. an externally shared
    /// store for multi-instance deployments
    pub fn with_store(config: ShieldConfig, tracker: Arc<dyn ViolationStore>) -> Result<Self> {
        let engine = DetectorEngine::new(config.detection.max_text_chars)?;
        Ok(Self {
            config,
            engine,
            tracker,
        })
    }

    /// Run the full detection pipeline over one message
    pub async fn detect(&self, request: DetectionRequest) -> DetectionResult {
        let started = Instant::now();
        let sensitivity = request
            .sensitivity
            .unwrap_or(self.config.detection.default_sensitivity);
        let profile = self.config.detection.profiles.active(sensitivity);

        let text = self.engine.truncate(&request.text);
        let normalized = normalize::normalize(text);
        let violations = self.engine.detect(text, &normalized);

        let severity_score = score::severity_score(&violations);
        let threshold_met = score::threshold_met(&violations, &normalized, profile);
        let decision = policy::decide(&violations, threshold_met);
        let masked_text = if violations.is_empty() {
            text.to_string()
        } else {
            mask::mask(text, &violations, &self.engine)
        };

        if decision == Decision::Blocked {
            if let Some(user_id) = &request.user_id {
                if let Err(e) = self.tracker.record(user_id).await {
                    tracing::warn!(
                        user_id = %user_id,
                        error = %e,
                        "violation tracker write failed, result unaffected"
                    );
                }
            }
        }

        DetectionResult {
            is_blocked: decision == Decision::Blocked,
            confidence: policy::confidence_bucket(severity_score),
            violation_type: violations.first().map(|v| v.violation_type),
            detected_pattern: violations.first().map(|v| v.pattern.clone()),
            original_text: text.to_string(),
            normalized_text: normalized.as_str().to_string(),
            severity_score,
            all_violations: violations,
            masked_text,
            detection_threshold_met: threshold_met,
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }

    /// Side-effect-free liveness probe, decoupled from detection state
    pub fn health(&self) -> bool {
        self.engine.patterns_loaded() > 0
    }

    /// Aggregate engine information
    pub fn stats(&self) -> SystemStats {
        SystemStats {
            patterns_loaded: self.engine.patterns_loaded(),
            default_sensitivity: self.config.detection.default_sensitivity,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            rate_limit_window_minutes: self.config.rate_limit.window_minutes,
            rate_limit_max_violations: self.config.rate_limit.max_violations,
        }
    }

    /// Rate-limit status for a user
    pub async fn user_violations(&self, user_id: &str) -> Result<UserViolations> {
        self.tracker.status(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;

    fn service() -> ModerationService {
        ModerationService::new(ShieldConfig::default()).unwrap()
    }

    fn request(text: &str, sensitivity: Sensitivity) -> DetectionRequest {
        DetectionRequest {
            text: text.to_string(),
            user_id: None,
            sensitivity: Some(sensitivity),
        }
    }

    #[tokio::test]
    async fn test_scenario_email_high_sensitivity_blocks() {
        let result = service()
            .detect(request(
                "reach me at john.doe@example.com please",
                Sensitivity::High,
            ))
            .await;
        assert!(result.is_blocked);
        assert!(result
            .all_violations
            .iter()
            .any(|v| v.violation_type == ViolationType::EmailAddress));
        assert_eq!(result.masked_text, "reach me at [EMAIL_REDACTED] please");
    }

    #[tokio::test]
    async fn test_scenario_low_density_phone_offers_mask() {
        let result = service()
            .detect(request(
                "Let's meet Monday, by the way my number is 5551234567 but that's the office line",
                Sensitivity::Medium,
            ))
            .await;
        assert!(!result.is_blocked);
        assert!(!result.detection_threshold_met);
        assert!(!result.all_violations.is_empty());
        assert_eq!(
            result.all_violations[0].violation_type,
            ViolationType::PhoneNumber
        );
    }

    #[tokio::test]
    async fn test_scenario_clean_text_allows() {
        let result = service()
            .detect(request(
                "See you at the appointment tomorrow",
                Sensitivity::High,
            ))
            .await;
        assert!(!result.is_blocked);
        assert!(result.all_violations.is_empty());
        assert_eq!(result.masked_text, result.original_text);
    }

    #[tokio::test]
    async fn test_detect_on_masked_text_is_clean() {
        let svc = service();
        let first = svc
            .detect(request(
                "call 9 8 7 6 5 4 3 2 1 0 or mail john@example.com",
                Sensitivity::High,
            ))
            .await;
        let second = svc
            .detect(request(&first.masked_text, Sensitivity::High))
            .await;
        assert!(second.all_violations.is_empty());
        assert!(!second.detection_threshold_met);
        assert!(!second.is_blocked);
    }

    #[tokio::test]
    async fn test_normalization_robustness_both_forms_flag_phone() {
        let svc = service();
        for input in ["987-654-3210", "9 8 7 6 5 4 3 2 1 0"] {
            let result = svc.detect(request(input, Sensitivity::High)).await;
            assert!(
                result
                    .all_violations
                    .iter()
                    .any(|v| v.violation_type == ViolationType::PhoneNumber),
                "expected phone violation for {:?}",
                input
            );
        }
    }

    #[tokio::test]
    async fn test_determinism_excluding_timing() {
        let svc = service();
        let a = svc
            .detect(request("call 5551234567 or @someone_42", Sensitivity::High))
            .await;
        let b = svc
            .detect(request("call 5551234567 or @someone_42", Sensitivity::High))
            .await;
        assert_eq!(a.is_blocked, b.is_blocked);
        assert_eq!(a.severity_score, b.severity_score);
        assert_eq!(a.all_violations, b.all_violations);
        assert_eq!(a.masked_text, b.masked_text);
        assert_eq!(a.detection_threshold_met, b.detection_threshold_met);
        assert_eq!(a.normalized_text, b.normalized_text);
    }

    #[tokio::test]
    async fn test_empty_text_allows() {
        let result = service().detect(request("", Sensitivity::High)).await;
        assert!(!result.is_blocked);
        assert!(result.all_violations.is_empty());
        assert_eq!(result.masked_text, "");
    }

    #[tokio::test]
    async fn test_oversized_input_truncated_not_rejected() {
        let text = format!("mail john@example.com {}", "filler ".repeat(3000));
        let result = service().detect(request(&text, Sensitivity::High)).await;
        assert!(result.original_text.chars().count() <= 10_000);
        assert!(result.is_blocked);
    }

    #[tokio::test]
    async fn test_blocked_messages_feed_rate_limit() {
        let svc = service();
        for _ in 0..4 {
            let result = svc
                .detect(DetectionRequest {
                    text: "reach me at john@example.com".to_string(),
                    user_id: Some("user-1".to_string()),
                    sensitivity: Some(Sensitivity::High),
                })
                .await;
            assert!(result.is_blocked);
        }
        let status = svc.user_violations("user-1").await.unwrap();
        assert_eq!(status.violation_count, 4);
        assert!(status.is_rate_limited);
    }

    #[tokio::test]
    async fn test_mask_offered_does_not_feed_rate_limit() {
        let svc = service();
        let result = svc
            .detect(DetectionRequest {
                text: "Let's meet Monday, by the way my number is 5551234567 but that's the office line"
                    .to_string(),
                user_id: Some("user-2".to_string()),
                sensitivity: Some(Sensitivity::Medium),
            })
            .await;
        assert!(!result.is_blocked);
        let status = svc.user_violations("user-2").await.unwrap();
        assert_eq!(status.violation_count, 0);
    }

    struct FailingStore;

    #[async_trait]
    impl ViolationStore for FailingStore {
        async fn record(&self, _user_id: &str) -> Result<()> {
            Err(Error::Tracker("backend offline".to_string()))
        }

        async fn status(&self, _user_id: &str) -> Result<UserViolations> {
            Err(Error::Tracker("backend offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_tracker_failure_does_not_affect_result() {
        let svc =
            ModerationService::with_store(ShieldConfig::default(), Arc::new(FailingStore)).unwrap();
        let result = svc
            .detect(DetectionRequest {
                text: "reach me at john@example.com".to_string(),
                user_id: Some("user-3".to_string()),
                sensitivity: Some(Sensitivity::High),
            })
            .await;
        assert!(result.is_blocked);
        assert!(!result.all_violations.is_empty());
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let svc = service();
        assert!(svc.health());
        let stats = svc.stats();
        assert_eq!(stats.patterns_loaded, 7);
        assert_eq!(stats.default_sensitivity, Sensitivity::High);
        assert_eq!(stats.rate_limit_window_minutes, 60);
        assert_eq!(stats.rate_limit_max_violations, 3);
        assert!(!stats.engine_version.is_empty());
    }
}
