//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" shared by every crate:
//! - The unified error type and result alias
//! - Error classification mapped onto HTTP status codes
//! - RFC 7807 rendering of errors at the HTTP boundary (feature `axum`)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
