//! API Router
//!
//! Every route here goes through the general-api limiter.

use access::{AccessError, Permission, PermissionSet, Role};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use platform::rate_limit::RateLimiters;
use platform::rate_limit::middleware::enforce_rate_limit;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub fn api_router(limiters: &RateLimiters) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/roles/{role}/permissions", get(role_permissions))
        .route("/roles/{role}/permissions/{permission}", get(authorize))
        .layer(from_fn_with_state(limiters.api.clone(), enforce_rate_limit))
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/roles/{role}/permissions
///
/// Full permission set of a role, for rendering UI affordances.
async fn role_permissions(
    Path(role): Path<String>,
) -> Result<Json<&'static PermissionSet>, AccessError> {
    let role: Role = role.parse()?;
    Ok(Json(access::role_permissions(role)))
}

/// GET /api/roles/{role}/permissions/{permission}
///
/// 204 when the role holds the permission, 403 otherwise.
async fn authorize(
    Path((role, permission)): Path<(String, String)>,
) -> Result<StatusCode, AccessError> {
    let role: Role = role.parse()?;
    let permission: Permission = permission.parse()?;
    access::assert_permission(role, permission, None)?;
    Ok(StatusCode::NO_CONTENT)
}
