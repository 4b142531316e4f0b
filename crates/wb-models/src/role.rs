//! Roles and the permissions they grant
//!
//! Every authorization decision is derived from [`Role::permissions`]; handlers
//! and contracts ask for a permission, never for a role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::literal::ParseLiteralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Admin,
}

const EMPLOYEE_PERMISSIONS: &[&str] = &[permissions::VIEW_PROJECTS];

const MANAGER_PERMISSIONS: &[&str] = &[
    permissions::VIEW_PROJECTS,
    permissions::MANAGE_PROJECTS,
    permissions::VIEW_ALL_WORK_ITEMS,
    permissions::MANAGE_WORK_ITEMS,
    permissions::REVIEW_WORK_ITEMS,
    permissions::VIEW_TEAM_DASHBOARD,
    permissions::VIEW_USERS,
];

const ADMIN_PERMISSIONS: &[&str] = &[
    permissions::VIEW_PROJECTS,
    permissions::MANAGE_PROJECTS,
    permissions::VIEW_ALL_WORK_ITEMS,
    permissions::MANAGE_WORK_ITEMS,
    permissions::REVIEW_WORK_ITEMS,
    permissions::APPROVE_OWN_WORK_ITEMS,
    permissions::VIEW_TEAM_DASHBOARD,
    permissions::VIEW_USERS,
    permissions::MANAGE_USERS,
];

impl Role {
    const LITERALS: &'static [&'static str] = &["Employee", "Manager", "Admin"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }

    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Self::Employee => EMPLOYEE_PERMISSIONS,
            Self::Manager => MANAGER_PERMISSIONS,
            Self::Admin => ADMIN_PERMISSIONS,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseLiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Employee" => Ok(Self::Employee),
            "Manager" => Ok(Self::Manager),
            "Admin" => Ok(Self::Admin),
            other => Err(ParseLiteralError::new("role", other, Self::LITERALS)),
        }
    }
}

/// Permission names
pub mod permissions {
    pub const VIEW_PROJECTS: &str = "view_projects";
    pub const MANAGE_PROJECTS: &str = "manage_projects";

    /// See work items assigned to anyone
    pub const VIEW_ALL_WORK_ITEMS: &str = "view_all_work_items";
    /// Create, reassign and delete work items
    pub const MANAGE_WORK_ITEMS: &str = "manage_work_items";
    /// Decide on items in review and move anyone's items along
    pub const REVIEW_WORK_ITEMS: &str = "review_work_items";
    pub const APPROVE_OWN_WORK_ITEMS: &str = "approve_own_work_items";

    pub const VIEW_TEAM_DASHBOARD: &str = "view_team_dashboard";

    pub const VIEW_USERS: &str = "view_users";
    /// Register users, change roles, edit other people's profiles
    pub const MANAGE_USERS: &str = "manage_users";
}
