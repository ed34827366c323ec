//! Sliding-window limiter
//!
//! Each accepted request appends a timestamped record; a request is admitted
//! while the records newer than `now - window` sum to less than
//! `max_requests`. Capacity frees up one record at a time as records age
//! out, not all at once at a bucket boundary.

use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::store::{MemoryStore, RateLimitStore, RequestRecord};
use super::{RateLimitConfig, RateLimitResult, RateLimitStatus};

#[derive(Clone)]
pub struct SlidingWindowLimiter {
    config: RateLimitConfig,
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowLimiter {
    pub fn new(
        config: RateLimitConfig,
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            clock,
        }
    }

    /// Limiter with its own private in-memory store and the wall clock
    pub fn in_memory(config: RateLimitConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and record a request for `key`.
    ///
    /// Never fails: exhaustion is reported through `allowed: false`. A
    /// rejected attempt is not recorded.
    pub fn check(&self, key: &str) -> RateLimitResult {
        let now = self.clock.now_ms();
        let window_ms = self.config.window_ms();
        let max = self.config.max_requests();
        let store_key = self.store_key(key);

        let mut records = self.live_records(&store_key, now);
        let total = total_requests(&records);

        if total >= max {
            let reset_at_ms = records
                .first()
                .map(|oldest| oldest.timestamp_ms.saturating_add(window_ms))
                .unwrap_or(now.saturating_add(window_ms));
            let retry_after_secs = (reset_at_ms.saturating_sub(now).max(0) as u64).div_ceil(1000);

            tracing::warn!(
                limiter = %self.config.identifier(),
                key = %key,
                total,
                max,
                retry_after_secs,
                "Rate limit exceeded"
            );

            return RateLimitResult {
                allowed: false,
                limit: max,
                remaining: 0,
                reset_at_ms,
                retry_after_secs: Some(retry_after_secs),
            };
        }

        records.push(RequestRecord::hit(now));
        self.store.set(&store_key, records);

        let remaining = max.saturating_sub(total + 1);

        tracing::debug!(
            limiter = %self.config.identifier(),
            key = %key,
            remaining,
            "Rate limit check passed"
        );

        RateLimitResult {
            allowed: true,
            limit: max,
            remaining,
            reset_at_ms: now.saturating_add(window_ms),
            retry_after_secs: None,
        }
    }

    /// Record a hit without looking at the decision
    pub fn increment(&self, key: &str) {
        let _ = self.check(key);
    }

    /// Forget every record for `key`
    pub fn reset(&self, key: &str) {
        self.store.delete(&self.store_key(key));
        tracing::debug!(limiter = %self.config.identifier(), key = %key, "Rate limit reset");
    }

    /// Window state for `key` without recording a request
    pub fn status(&self, key: &str) -> RateLimitStatus {
        let now = self.clock.now_ms();
        let window_ms = self.config.window_ms();
        let records = self.live_records(&self.store_key(key), now);
        let current_requests = total_requests(&records);

        RateLimitStatus {
            current_requests,
            remaining: self.config.max_requests().saturating_sub(current_requests),
            reset_at_ms: records
                .first()
                .map(|oldest| oldest.timestamp_ms.saturating_add(window_ms))
                .unwrap_or(now.saturating_add(window_ms)),
        }
    }

    fn store_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.identifier(), key)
    }

    fn live_records(&self, store_key: &str, now: i64) -> Vec<RequestRecord> {
        let window_start = now.saturating_sub(self.config.window_ms());
        let mut records = self.store.get(store_key);
        records.retain(|r| r.timestamp_ms > window_start);
        records
    }
}

fn total_requests(records: &[RequestRecord]) -> u32 {
    records.iter().fold(0u32, |acc, r| acc.saturating_add(r.count))
}
