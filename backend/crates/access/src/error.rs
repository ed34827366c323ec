//! Access Error Types
//!
//! This module provides authorization error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::{Permission, Role};

/// Access-specific result type alias
pub type AccessResult<T> = Result<T, AccessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The role does not hold the permission. Not retryable.
    #[error("PERMISSION_DENIED: role '{role}' is not allowed to {action}")]
    PermissionDenied {
        role: Role,
        permission: Permission,
        /// Caller-supplied description, or the permission code
        action: String,
    },

    /// A stored or requested role code outside owner/editor/viewer
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),
}

impl AccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::PermissionDenied { .. } => ErrorKind::Forbidden,
            AccessError::UnknownRole(_) | AccessError::UnknownPermission(_) => {
                ErrorKind::BadRequest
            }
        }
    }

    /// Convert to AppError
    ///
    /// Denials render as a generic message; the role and permission stay in
    /// the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccessError::PermissionDenied { .. } => AppError::forbidden("Access denied"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AccessError::PermissionDenied {
                role, permission, ..
            } => {
                tracing::warn!(role = %role, permission = %permission, "Permission denied");
            }
            _ => {
                tracing::debug!(error = %self, "Access error");
            }
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
