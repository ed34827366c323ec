//! Permission matrix
//!
//! One row per [`Role`], one column per [`Permission`] in `Permission::ALL`
//! order. Array lengths make the table total; the `const` block below makes
//! it monotonic (owner ⊇ editor ⊇ viewer). Both fail the build, not a request.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::value_object::{Permission, Role};
use crate::error::{AccessError, AccessResult};

//  workspace             | members                    | components                 | viewing
//  update delete public  | add    remove roles invite | create update delete canon | comps  analyt activity
const OWNER: [bool; Permission::COUNT] = [
    true, true, true, true, true, true, true, true, true, true, true, true, true, true,
];
const EDITOR: [bool; Permission::COUNT] = [
    false, false, false, false, false, false, false, true, true, true, true, true, true, true,
];
const VIEWER: [bool; Permission::COUNT] = [
    false, false, false, false, false, false, false, false, false, false, false, true, true, true,
];

const _: () = {
    let mut i = 0;
    while i < Permission::COUNT {
        assert!(!VIEWER[i] || EDITOR[i], "editor must hold every viewer permission");
        assert!(!EDITOR[i] || OWNER[i], "owner must hold every editor permission");
        i += 1;
    }
};

/// Indexed by `Role::index()`
static MATRIX: [PermissionSet; Role::COUNT] = [
    PermissionSet::new(Role::Viewer, VIEWER),
    PermissionSet::new(Role::Editor, EDITOR),
    PermissionSet::new(Role::Owner, OWNER),
];

/// Every permission of one role
///
/// Serializes as `{ "can_update_workspace": true, ... }` with all fourteen
/// keys present for every role.
#[derive(Debug, PartialEq, Eq)]
pub struct PermissionSet {
    role: Role,
    grants: [bool; Permission::COUNT],
}

impl PermissionSet {
    const fn new(role: Role, grants: [bool; Permission::COUNT]) -> Self {
        Self { role, grants }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn allows(&self, permission: Permission) -> bool {
        self.grants[permission.index()]
    }

    /// `(permission, granted)` for every permission
    pub fn iter(&self) -> impl Iterator<Item = (Permission, bool)> + '_ {
        Permission::ALL.into_iter().map(|p| (p, self.allows(p)))
    }

    /// Only the granted permissions
    pub fn granted(&self) -> impl Iterator<Item = Permission> + '_ {
        self.iter().filter_map(|(p, granted)| granted.then_some(p))
    }

    /// `true` when every permission granted here is granted in `other` too
    pub fn is_subset_of(&self, other: &PermissionSet) -> bool {
        self.granted().all(|p| other.allows(p))
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Permission::COUNT))?;
        for (permission, granted) in self.iter() {
            map.serialize_entry(permission.code(), &granted)?;
        }
        map.end()
    }
}

/// Whether `role` may perform `permission`
#[inline]
pub fn has_permission(role: Role, permission: Permission) -> bool {
    role_permissions(role).allows(permission)
}

/// Fail with [`AccessError::PermissionDenied`] unless `role` holds `permission`
///
/// `action` is a human-readable description used in the error message;
/// the permission code is used when it is `None`.
pub fn assert_permission(
    role: Role,
    permission: Permission,
    action: Option<&str>,
) -> AccessResult<()> {
    if has_permission(role, permission) {
        return Ok(());
    }
    Err(AccessError::PermissionDenied {
        role,
        permission,
        action: action.map_or_else(|| permission.code().to_string(), str::to_string),
    })
}

/// The full permission set of `role`
///
/// Always the same static object for the same role.
#[inline]
pub fn role_permissions(role: Role) -> &'static PermissionSet {
    &MATRIX[role.index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::PermissionGroup;

    #[test]
    fn test_owner_has_every_permission() {
        for permission in Permission::ALL {
            assert!(has_permission(Role::Owner, permission), "{permission}");
        }
    }

    #[test]
    fn test_workspace_and_member_management_is_owner_only() {
        for permission in Permission::ALL.into_iter().filter(|p| {
            matches!(p.group(), PermissionGroup::Workspace | PermissionGroup::Members)
        }) {
            assert!(!has_permission(Role::Editor, permission), "{permission}");
            assert!(!has_permission(Role::Viewer, permission), "{permission}");
        }
    }

    #[test]
    fn test_component_management_is_editor_and_up() {
        for permission in Permission::ALL
            .into_iter()
            .filter(|p| p.group() == PermissionGroup::Components)
        {
            assert!(has_permission(Role::Editor, permission), "{permission}");
            assert!(!has_permission(Role::Viewer, permission), "{permission}");
        }
    }

    #[test]
    fn test_view_permissions_for_every_role() {
        for role in Role::ALL {
            assert!(has_permission(role, Permission::ViewComponents));
            assert!(has_permission(role, Permission::ViewAnalytics));
            assert!(has_permission(role, Permission::ViewActivity));
        }
    }

    #[test]
    fn test_matrix_rows_match_roles() {
        for role in Role::ALL {
            assert_eq!(role_permissions(role).role(), role);
        }
    }

    #[test]
    fn test_granted_counts_per_role() {
        assert_eq!(role_permissions(Role::Owner).granted().count(), 14);
        assert_eq!(role_permissions(Role::Editor).granted().count(), 7);
        assert_eq!(role_permissions(Role::Viewer).granted().count(), 3);
    }

    #[test]
    fn test_monotonic_in_role_rank() {
        let owner = role_permissions(Role::Owner);
        let editor = role_permissions(Role::Editor);
        let viewer = role_permissions(Role::Viewer);
        assert!(viewer.is_subset_of(editor));
        assert!(editor.is_subset_of(owner));

        for permission in Permission::ALL {
            for higher in Role::ALL {
                for lower in Role::ALL.into_iter().filter(|r| *r <= higher) {
                    if has_permission(lower, permission) {
                        assert!(has_permission(higher, permission));
                    }
                }
            }
        }
    }

    #[test]
    fn test_assert_permission_denied_message() {
        let err = assert_permission(Role::Viewer, Permission::DeleteWorkspace, None).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PERMISSION_DENIED"), "{message}");
        assert!(message.contains("viewer"), "{message}");
        assert!(message.contains("can_delete_workspace"), "{message}");
    }

    #[test]
    fn test_assert_permission_uses_action_description() {
        let err = assert_permission(
            Role::Editor,
            Permission::SendInvites,
            Some("invite members to this workspace"),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PERMISSION_DENIED"));
        assert!(message.contains("editor"));
        assert!(message.contains("invite members to this workspace"));
        assert!(!message.contains("can_send_invites"));
    }

    #[test]
    fn test_assert_permission_owner_never_fails() {
        for permission in Permission::ALL {
            assert!(assert_permission(Role::Owner, permission, None).is_ok());
            assert!(assert_permission(Role::Owner, permission, Some("do anything")).is_ok());
        }
    }

    #[test]
    fn test_role_permissions_is_the_same_object() {
        for role in Role::ALL {
            assert!(std::ptr::eq(role_permissions(role), role_permissions(role)));
        }
    }

    #[test]
    fn test_every_role_exposes_the_same_keys() {
        let keys = |role| {
            let json = serde_json::to_value(role_permissions(role)).unwrap();
            let mut keys: Vec<String> = json.as_object().unwrap().keys().cloned().collect();
            keys.sort();
            keys
        };
        let owner = keys(Role::Owner);
        assert_eq!(owner.len(), Permission::COUNT);
        assert_eq!(keys(Role::Editor), owner);
        assert_eq!(keys(Role::Viewer), owner);
    }

    #[test]
    fn test_serialized_values() {
        let json = serde_json::to_value(role_permissions(Role::Editor)).unwrap();
        assert_eq!(json["can_update_component"], true);
        assert_eq!(json["can_change_roles"], false);
        assert_eq!(json["can_view_activity"], true);
    }
}
