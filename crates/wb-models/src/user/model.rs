//! User model
//!
//! Table: users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use wb_core::traits::UserId;

use crate::role::Role;

/// User entity
///
/// The id is issued by the identity provider; credentials live there too.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[validate(length(min = 1, max = 255, message = "can't be blank"))]
    pub id: String,

    #[validate(email(message = "is not a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub user_name: String,

    #[serde(default)]
    pub role: Role,

    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            user_name: user_name.into(),
            role: Role::default(),
            created_at: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Registration payload: a user together with the profile created alongside it
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: UserId,
    pub email: String,
    pub user_name: String,
    pub role: Option<String>,
    /// Defaults to the user name
    pub full_name: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<i32>,
}

/// Body of a role change
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleDto {
    pub role: String,
}
