//! Per-user violation tracking for rate-limit reporting
//!
//! Records one timestamp per blocked message and reports how many fall inside
//! the sliding window. The store does not enforce anything itself; it is an
//! observability and escalation signal for the caller. The trait boundary
//! exists so an externally shared backing (for multi-instance deployments)
//! can replace the in-memory map.

use crate::config::RateLimitConfig;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Rate-limit status for one user
#[derive(Debug, Clone)]
pub struct UserViolations {
    pub user_id: String,
    pub violation_count: usize,
    pub is_rate_limited: bool,
    pub window_minutes: u64,
}

/// Storage interface for block-event bookkeeping
#[async_trait]
pub trait ViolationStore: Send + Sync {
    /// Record one block event for the user, exactly once per call
    async fn record(&self, user_id: &str) -> Result<()>;

    /// Current window status for the user; pure read apart from lazy
    /// eviction of expired entries
    async fn status(&self, user_id: &str) -> Result<UserViolations>;
}

/// Single-instance in-memory store behind a mutex-guarded map
pub struct InMemoryTracker {
    window: Duration,
    window_minutes: u64,
    max_violations: usize,
    entries: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl InMemoryTracker {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::minutes(config.window_minutes as i64),
            window_minutes: config.window_minutes,
            max_violations: config.max_violations,
            entries: Mutex::new(HashMap::new()),
        }
    }

    async fn record_at(&self, user_id: &str, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().await;
        let timestamps = entries.entry(user_id.to_string()).or_default();
        timestamps.push(now);
        let cutoff = now - self.window;
        timestamps.retain(|t| *t > cutoff);
    }

    async fn status_at(&self, user_id: &str, now: DateTime<Utc>) -> UserViolations {
        let mut entries = self.entries.lock().await;
        let cutoff = now - self.window;
        let violation_count = match entries.get_mut(user_id) {
            Some(timestamps) => {
                timestamps.retain(|t| *t > cutoff);
                timestamps.len()
            }
            None => 0,
        };
        UserViolations {
            user_id: user_id.to_string(),
            violation_count,
            is_rate_limited: violation_count > self.max_violations,
            window_minutes: self.window_minutes,
        }
    }
}

#[async_trait]
impl ViolationStore for InMemoryTracker {
    async fn record(&self, user_id: &str) -> Result<()> {
        self.record_at(user_id, Utc::now()).await;
        Ok(())
    }

    async fn status(&self, user_id: &str) -> Result<UserViolations> {
        Ok(self.status_at(user_id, Utc::now()).await)
    }
}
