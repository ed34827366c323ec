//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Sliding-window rate limiting (store, limiter, registry, background sweep)
//! - Rate limit enforcement at the HTTP boundary
//! - Client identification for rate limit keys

pub mod client;
pub mod rate_limit;
