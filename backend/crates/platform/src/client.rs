//! Client identification utilities
//!
//! Derives the key a request is rate limited under.

use axum::http::{Extensions, HeaderMap};

/// Identifier used when neither a user nor an address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Proxy headers carrying the client address, in priority order
const CLIENT_IP_HEADERS: [&str; 2] = ["cf-connecting-ip", "x-real-ip"];

/// Authenticated caller, inserted into request extensions by the session layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Extract client IP address from proxy headers
///
/// Checks the CDN connecting-IP header, then `X-Real-IP`, then the first
/// entry of `X-Forwarded-For`. Values are not parsed; the first non-empty
/// one wins.
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    CLIENT_IP_HEADERS
        .iter()
        .find_map(|name| header_value(*name))
        .or_else(|| {
            header_value("x-forwarded-for")
                .and_then(|xff| xff.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(str::to_owned)
}

/// Rate limit key for a request
///
/// Prefers the authenticated user id, then the client IP, then
/// [`UNKNOWN_CLIENT`].
pub fn client_identifier(headers: &HeaderMap, extensions: &Extensions) -> String {
    if let Some(user) = extensions.get::<AuthenticatedUser>() {
        return user.user_id.clone();
    }
    extract_client_ip(headers).unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
