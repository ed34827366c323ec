//! Preconfigured limiters
//!
//! Built once at startup and handed to the routers that need them.

use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::limiter::SlidingWindowLimiter;
use super::store::{MemoryStore, RateLimitStore};
use super::sweeper::SweepConfig;
use super::RateLimitConfig;

/// The named limiters of the service, sharing one store
///
/// Each limiter has its own identifier, so the same user id is counted
/// separately by every limiter.
#[derive(Clone)]
pub struct RateLimiters {
    /// Sign-in and session endpoints (5/min)
    pub auth: SlidingWindowLimiter,
    /// Presence and edit broadcasts to the pub/sub provider (60/min)
    pub realtime: SlidingWindowLimiter,
    /// Everything else (100/min)
    pub api: SlidingWindowLimiter,
    /// Exports and analytics rollups (10/min)
    pub expensive: SlidingWindowLimiter,
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiters {
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        let build = |config: RateLimitConfig| {
            SlidingWindowLimiter::new(config, store.clone(), clock.clone())
        };

        Self {
            auth: build(RateLimitConfig::strict_auth()),
            realtime: build(RateLimitConfig::moderate_realtime()),
            api: build(RateLimitConfig::general_api()),
            expensive: build(RateLimitConfig::expensive_operation()),
            store,
            clock,
        }
    }

    /// Process-local limiters on the wall clock
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn store(&self) -> Arc<dyn RateLimitStore> {
        self.store.clone()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn all(&self) -> [&SlidingWindowLimiter; 4] {
        [&self.auth, &self.realtime, &self.api, &self.expensive]
    }

    pub fn longest_window(&self) -> Duration {
        self.all()
            .iter()
            .map(|limiter| limiter.config().window())
            .max()
            .unwrap_or_default()
    }

    /// Sweep settings that never drop records a limiter still counts
    pub fn sweep_config(&self, base: SweepConfig) -> SweepConfig {
        SweepConfig {
            max_age: base.max_age.max(self.longest_window()),
            ..base
        }
    }
}
