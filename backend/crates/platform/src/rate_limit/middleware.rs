//! Rate limit enforcement at the HTTP boundary
//!
//! Accepted requests get `X-RateLimit-*` headers on the response; rejected
//! ones get a 429 with the same headers plus `Retry-After`.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;

use super::RateLimitResult;
use super::limiter::SlidingWindowLimiter;
use crate::client::client_identifier;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

impl RateLimitResult {
    /// Write the rate limit headers for this result
    pub fn apply_headers(&self, headers: &mut HeaderMap) {
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(X_RATELIMIT_RESET, HeaderValue::from(self.reset_at_ms));
        if let Some(secs) = self.retry_after_secs {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
    }

    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.apply_headers(&mut headers);
        headers
    }

    /// 429 response for a rejected check
    pub fn rejection(&self) -> Response {
        let mut response = AppError::too_many_requests("Rate limit exceeded")
            .with_action("Please wait before retrying")
            .with_retry_after(self.retry_after_secs.unwrap_or(0))
            .into_response();
        self.apply_headers(response.headers_mut());
        response
    }
}

/// Middleware applying one limiter to every request of a router
///
/// ```ignore
/// Router::new()
///     .route("/health", get(health))
///     .layer(axum::middleware::from_fn_with_state(limiters.api.clone(), enforce_rate_limit))
/// ```
pub async fn enforce_rate_limit(
    State(limiter): State<SlidingWindowLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = client_identifier(req.headers(), req.extensions());
    let result = limiter.check(&key);

    if !result.allowed {
        return result.rejection();
    }

    let mut response = next.run(req).await;
    result.apply_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AuthenticatedUser;
    use crate::rate_limit::{ManualClock, MemoryStore, RateLimitConfig};
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const START_MS: i64 = 1_700_000_000_000;

    fn app(max: u32) -> Router {
        let limiter = SlidingWindowLimiter::new(
            RateLimitConfig::new("test", max, Duration::from_secs(60)).unwrap(),
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new(START_MS)),
        );
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(limiter, enforce_rate_limit))
    }

    fn request_from(ip: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_headers_on_rejection() {
        let result = RateLimitResult {
            allowed: false,
            limit: 5,
            remaining: 0,
            reset_at_ms: 1_700_000_010_000,
            retry_after_secs: Some(10),
        };
        let headers = result.headers();
        assert_eq!(headers[X_RATELIMIT_LIMIT], "5");
        assert_eq!(headers[X_RATELIMIT_REMAINING], "0");
        assert_eq!(headers[X_RATELIMIT_RESET], "1700000010000");
        assert_eq!(headers[header::RETRY_AFTER], "10");
    }

    #[tokio::test]
    async fn test_accepted_requests_carry_headers() {
        let app = app(2);

        let response = app.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_RATELIMIT_LIMIT], "2");
        assert_eq!(response.headers()[X_RATELIMIT_REMAINING], "1");
        assert_eq!(response.headers()[X_RATELIMIT_RESET], "1700000060000");
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[tokio::test]
    async fn test_rejected_request_is_429() {
        let app = app(1);

        let first = app.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(second.headers()[X_RATELIMIT_LIMIT], "1");
        assert_eq!(second.headers()[X_RATELIMIT_REMAINING], "0");
        assert_eq!(second.headers()[X_RATELIMIT_RESET], "1700000060000");
        assert_eq!(second.headers()[header::RETRY_AFTER], "60");

        let other_ip = app.oneshot(request_from("10.0.0.2")).await.unwrap();
        assert_eq!(other_ip.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authenticated_user_is_the_key() {
        let app = app(1);

        let mut req = request_from("10.0.0.1");
        req.extensions_mut().insert(AuthenticatedUser::new("user-1"));
        assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::OK);

        // Same IP, different user
        let mut req = request_from("10.0.0.1");
        req.extensions_mut().insert(AuthenticatedUser::new("user-2"));
        assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::OK);
    }
}
