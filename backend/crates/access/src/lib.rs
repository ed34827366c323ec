//! Access (Workspace Authorization) Module
//!
//! Role-based permission model for workspace memberships.
//!
//! - `domain/value_object/` - [`Role`] and [`Permission`] closed enumerations
//! - `domain/policy` - the role × permission matrix and its queries
//! - `error` - [`AccessError`] and its HTTP rendering
//!
//! ## Model
//! - Three roles, ordered by capability: owner ⊇ editor ⊇ viewer
//! - Fourteen permissions in four groups (workspace, members, components, viewing)
//! - The matrix is total and monotonic; both properties are checked at compile time
//!
//! The membership role itself is looked up by the caller from the persisted
//! workspace membership; this crate only evaluates it.

pub mod domain;
pub mod error;

// Re-exports for convenience
pub use domain::policy::{PermissionSet, assert_permission, has_permission, role_permissions};
pub use domain::value_object::{Permission, PermissionGroup, Role};
pub use error::{AccessError, AccessResult};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
