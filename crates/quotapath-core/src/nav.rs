//! Role-based navigation allow-list.
//!
//! The list is static. A role not named on an item never sees it, including
//! roles this client does not recognize.

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub title: &'static str,
    pub path: &'static str,
    roles: &'static [Role],
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Manager, Role::Rep];
const MANAGEMENT: &[Role] = &[Role::Admin, Role::Manager];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        title: "Dashboard",
        path: "/dashboard",
        roles: ALL_ROLES,
    },
    NavItem {
        title: "Deals",
        path: "/deals",
        roles: ALL_ROLES,
    },
    NavItem {
        title: "Commissions",
        path: "/commissions",
        roles: ALL_ROLES,
    },
    NavItem {
        title: "Users",
        path: "/users",
        roles: MANAGEMENT,
    },
    NavItem {
        title: "Settings",
        path: "/settings",
        roles: ADMIN_ONLY,
    },
];

impl NavItem {
    pub fn allows(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn roles(&self) -> &'static [Role] {
        self.roles
    }
}

/// Navigation entries visible to `role`, in display order.
pub fn visible_items(role: &Role) -> Vec<&'static NavItem> {
    NAV_ITEMS.iter().filter(|item| item.allows(role)).collect()
}

/// Whether `role` may open `path`. Paths not on the list are not allowed.
pub fn is_path_allowed(role: &Role, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    NAV_ITEMS
        .iter()
        .any(|item| item.path == path && item.allows(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(role: &Role) -> Vec<&'static str> {
        visible_items(role).iter().map(|item| item.title).collect()
    }

    #[test]
    fn test_rep_never_sees_admin_entries() {
        let rep = titles(&Role::Rep);
        assert_eq!(rep, vec!["Dashboard", "Deals", "Commissions"]);
        for item in NAV_ITEMS.iter().filter(|i| !i.allows(&Role::Rep)) {
            assert!(!rep.contains(&item.title));
        }
        assert!(!is_path_allowed(&Role::Rep, "/settings"));
        assert!(!is_path_allowed(&Role::Rep, "/users/"));
    }

    #[test]
    fn test_manager_and_admin() {
        assert_eq!(
            titles(&Role::Manager),
            vec!["Dashboard", "Deals", "Commissions", "Users"]
        );
        assert_eq!(titles(&Role::Admin).len(), NAV_ITEMS.len());
        assert!(is_path_allowed(&Role::Admin, "/settings/"));
    }

    #[test]
    fn test_unknown_role_sees_nothing() {
        let unknown = Role::Other("auditor".to_string());
        assert!(visible_items(&unknown).is_empty());
        assert!(!is_path_allowed(&unknown, "/dashboard"));
    }
}
