//! Error conversions - HTTP rendering
//!
//! The RFC 7807 response body used at the HTTP boundary, and the axum
//! `IntoResponse` impl built on it.

use super::app_error::AppError;

/// RFC 7807 Problem Details body
pub fn problem_details(err: &AppError) -> serde_json::Value {
    serde_json::json!({
        "type": format!("https://httpstatuses.io/{}", err.status_code()),
        "title": err.kind().as_str(),
        "code": err.kind().code(),
        "status": err.status_code(),
        "detail": err.message(),
        "action": err.action(),
    })
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(problem_details(&self))).into_response();

        if let Some(secs) = self.retry_after_secs() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}
