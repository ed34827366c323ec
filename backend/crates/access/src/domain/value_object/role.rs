use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AccessError;

/// Role of a user within one workspace membership
///
/// Ordered by capability: `Viewer < Editor < Owner`. Every permission held by
/// a lower role is also held by the higher ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Role {
    #[display("viewer")]
    Viewer = 0,
    #[display("editor")]
    Editor = 1,
    #[display("owner")]
    Owner = 2,
}

impl Role {
    pub const COUNT: usize = 3;

    /// All roles, lowest capability first
    pub const ALL: [Role; Role::COUNT] = [Role::Viewer, Role::Editor, Role::Owner];

    #[inline]
    pub const fn rank(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Owner => "owner",
        }
    }

    /// `true` when this role has at least the capability of `other`
    #[inline]
    pub const fn at_least(&self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    #[inline]
    pub const fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "owner" => Ok(Role::Owner),
            _ => Err(AccessError::UnknownRole(code.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_code() {
        assert_eq!("viewer".parse::<Role>().unwrap(), Role::Viewer);
        assert_eq!("editor".parse::<Role>().unwrap(), Role::Editor);
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
    }

    #[test]
    fn test_role_from_unknown_code() {
        assert!(matches!(
            "admin".parse::<Role>(),
            Err(AccessError::UnknownRole(code)) if code == "admin"
        ));
        assert!("Owner".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_display_matches_code() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.code());
        }
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Owner > Role::Editor);
        assert!(Role::Editor > Role::Viewer);
        assert!(Role::Owner.at_least(Role::Viewer));
        assert!(Role::Editor.at_least(Role::Editor));
        assert!(!Role::Viewer.at_least(Role::Editor));
        assert!(Role::Owner.is_owner());
        assert!(!Role::Editor.is_owner());
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Editor).unwrap();
        assert_eq!(json, "\"editor\"");
        let role: Role = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(role, Role::Owner);
    }
}
