//! Permission Value Objects
//!
//! The closed set of capabilities a workspace role can be granted.
//! Codes (`can_delete_workspace`, ...) are the wire and storage form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AccessError;

/// What a permission is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionGroup {
    /// Settings, deletion and visibility of the workspace itself
    Workspace,
    /// Membership and invitations
    Members,
    /// Components and their versions
    Components,
    /// Read-only access
    Viewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Permission {
    // Workspace management
    #[serde(rename = "can_update_workspace")]
    UpdateWorkspace,
    #[serde(rename = "can_delete_workspace")]
    DeleteWorkspace,
    #[serde(rename = "can_make_public")]
    MakePublic,

    // Member management
    #[serde(rename = "can_add_members")]
    AddMembers,
    #[serde(rename = "can_remove_members")]
    RemoveMembers,
    #[serde(rename = "can_change_roles")]
    ChangeRoles,
    #[serde(rename = "can_send_invites")]
    SendInvites,

    // Component management
    #[serde(rename = "can_create_component")]
    CreateComponent,
    #[serde(rename = "can_update_component")]
    UpdateComponent,
    #[serde(rename = "can_delete_component")]
    DeleteComponent,
    #[serde(rename = "can_set_canonical")]
    SetCanonical,

    // Viewing
    #[serde(rename = "can_view_components")]
    ViewComponents,
    #[serde(rename = "can_view_analytics")]
    ViewAnalytics,
    #[serde(rename = "can_view_activity")]
    ViewActivity,
}

impl Permission {
    pub const COUNT: usize = 14;

    /// All permissions in matrix column order
    pub const ALL: [Permission; Permission::COUNT] = [
        Permission::UpdateWorkspace,
        Permission::DeleteWorkspace,
        Permission::MakePublic,
        Permission::AddMembers,
        Permission::RemoveMembers,
        Permission::ChangeRoles,
        Permission::SendInvites,
        Permission::CreateComponent,
        Permission::UpdateComponent,
        Permission::DeleteComponent,
        Permission::SetCanonical,
        Permission::ViewComponents,
        Permission::ViewAnalytics,
        Permission::ViewActivity,
    ];

    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Permission::UpdateWorkspace => "can_update_workspace",
            Permission::DeleteWorkspace => "can_delete_workspace",
            Permission::MakePublic => "can_make_public",
            Permission::AddMembers => "can_add_members",
            Permission::RemoveMembers => "can_remove_members",
            Permission::ChangeRoles => "can_change_roles",
            Permission::SendInvites => "can_send_invites",
            Permission::CreateComponent => "can_create_component",
            Permission::UpdateComponent => "can_update_component",
            Permission::DeleteComponent => "can_delete_component",
            Permission::SetCanonical => "can_set_canonical",
            Permission::ViewComponents => "can_view_components",
            Permission::ViewAnalytics => "can_view_analytics",
            Permission::ViewActivity => "can_view_activity",
        }
    }

    pub const fn group(&self) -> PermissionGroup {
        use Permission::*;
        match self {
            UpdateWorkspace | DeleteWorkspace | MakePublic => PermissionGroup::Workspace,
            AddMembers | RemoveMembers | ChangeRoles | SendInvites => PermissionGroup::Members,
            CreateComponent | UpdateComponent | DeleteComponent | SetCanonical => {
                PermissionGroup::Components
            }
            ViewComponents | ViewAnalytics | ViewActivity => PermissionGroup::Viewing,
        }
    }

    #[inline]
    pub const fn is_read_only(&self) -> bool {
        matches!(self.group(), PermissionGroup::Viewing)
    }
}

const _: () = {
    let mut i = 0;
    while i < Permission::COUNT {
        assert!(Permission::ALL[i].index() == i, "Permission::ALL must follow discriminant order");
        i += 1;
    }
};

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Permission {
    type Err = AccessError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| AccessError::UnknownPermission(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_index_order() {
        for (i, permission) in Permission::ALL.iter().enumerate() {
            assert_eq!(permission.index(), i);
        }
    }

    #[test]
    fn test_codes_round_trip_through_from_str() {
        for permission in Permission::ALL {
            assert_eq!(permission.code().parse::<Permission>().unwrap(), permission);
        }
        assert!(matches!(
            "can_fly".parse::<Permission>(),
            Err(AccessError::UnknownPermission(code)) if code == "can_fly"
        ));
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Permission::SetCanonical).unwrap();
        assert_eq!(json, "\"can_set_canonical\"");
        let permission: Permission = serde_json::from_str("\"can_view_activity\"").unwrap();
        assert_eq!(permission, Permission::ViewActivity);
    }

    #[test]
    fn test_groups() {
        let count = |group: PermissionGroup| {
            Permission::ALL
                .iter()
                .filter(|p| p.group() == group)
                .count()
        };
        assert_eq!(count(PermissionGroup::Workspace), 3);
        assert_eq!(count(PermissionGroup::Members), 4);
        assert_eq!(count(PermissionGroup::Components), 4);
        assert_eq!(count(PermissionGroup::Viewing), 3);
        assert!(Permission::ViewAnalytics.is_read_only());
        assert!(!Permission::SendInvites.is_read_only());
    }
}
