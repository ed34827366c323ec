//! Rate Limiting Infrastructure
//!
//! In-process sliding-window rate limiting.
//!
//! - [`SlidingWindowLimiter`] - check/increment/reset/status against one namespace
//! - [`RateLimitStore`] - injectable record storage ([`MemoryStore`] by default)
//! - [`RateLimiters`] - the preconfigured limiters, sharing one store
//! - [`spawn_sweeper`] - background task that drops keys nobody has hit for a while
//! - [`middleware::enforce_rate_limit`] - HTTP boundary (429 + `X-RateLimit-*` headers)
//!
//! The limiter is best-effort and per-process: counts are not shared between
//! instances of the service unless a shared [`RateLimitStore`] is injected.

pub mod clock;
pub mod limiter;
pub mod middleware;
pub mod registry;
pub mod store;
pub mod sweeper;

use std::borrow::Cow;
use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use limiter::SlidingWindowLimiter;
pub use registry::RateLimiters;
pub use store::{MemoryStore, RateLimitStore, RequestRecord};
pub use sweeper::{SweepConfig, SweepHandle, spawn_sweeper};

/// Invalid limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitConfigError {
    #[error("Rate limit identifier must not be empty")]
    EmptyIdentifier,

    #[error("max_requests must be greater than zero")]
    ZeroMaxRequests,

    #[error("Rate limit window must be at least one millisecond")]
    ZeroWindow,

    #[error("Rate limit window does not fit in i64 milliseconds")]
    WindowTooLarge,
}

/// Rate limit configuration
///
/// `identifier` namespaces the tracked keys, so two limiters counting the
/// same user id never share counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Namespace for stored keys (`"{identifier}:{key}"`)
    identifier: Cow<'static, str>,
    /// Maximum requests allowed in the window
    max_requests: u32,
    /// Time window duration
    window: Duration,
    /// `window` in milliseconds, checked to fit `i64` at construction
    window_ms: i64,
}

impl RateLimitConfig {
    pub fn new(
        identifier: impl Into<Cow<'static, str>>,
        max_requests: u32,
        window: Duration,
    ) -> Result<Self, RateLimitConfigError> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(RateLimitConfigError::EmptyIdentifier);
        }
        if max_requests == 0 {
            return Err(RateLimitConfigError::ZeroMaxRequests);
        }
        if window.as_millis() == 0 {
            return Err(RateLimitConfigError::ZeroWindow);
        }
        let window_ms = i64::try_from(window.as_millis())
            .map_err(|_| RateLimitConfigError::WindowTooLarge)?;
        Ok(Self {
            identifier,
            max_requests,
            window,
            window_ms,
        })
    }

    const fn preset(identifier: &'static str, max_requests: u32, window_secs: u32) -> Self {
        Self {
            identifier: Cow::Borrowed(identifier),
            max_requests,
            window: Duration::from_secs(window_secs as u64),
            window_ms: window_secs as i64 * 1000,
        }
    }

    /// Strict limit for authentication endpoints: 5 requests per minute
    pub const fn strict_auth() -> Self {
        Self::preset("auth", 5, 60)
    }

    /// Realtime (presence / edit broadcast) endpoints: 60 requests per minute
    pub const fn moderate_realtime() -> Self {
        Self::preset("realtime", 60, 60)
    }

    /// General API endpoints: 100 requests per minute
    pub const fn general_api() -> Self {
        Self::preset("api", 100, 60)
    }

    /// Expensive operations (exports, analytics rollups): 10 requests per minute
    pub const fn expensive_operation() -> Self {
        Self::preset("expensive", 10, 60)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Configured maximum, echoed for `X-RateLimit-Limit`
    pub limit: u32,
    pub remaining: u32,
    /// Epoch milliseconds at which capacity is next guaranteed
    pub reset_at_ms: i64,
    /// Seconds to wait before retrying; only set on rejection
    pub retry_after_secs: Option<u64>,
}

/// Read-only view of a key's window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub current_requests: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
}
