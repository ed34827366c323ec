pub mod permission;
pub mod role;

pub use permission::{Permission, PermissionGroup};
pub use role::Role;
