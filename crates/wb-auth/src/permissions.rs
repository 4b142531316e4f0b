//! The authenticated caller and permission checks
//!
//! Permission sets come from [`Role::permissions`]; nothing here grants or
//! denies by role name.

use wb_contracts::UserContext;
use wb_core::error::WbError;
use wb_core::traits::UserId;
use wb_models::Role;

use crate::jwt::Claims;

/// Current user, as asserted by the identity provider's token
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            email: None,
            name: None,
        }
    }

    pub fn permissions(&self) -> &'static [&'static str] {
        self.role.permissions()
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            email: claims.email,
            name: claims.name,
        }
    }
}

impl UserContext for CurrentUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Role {
        self.role
    }
}

/// Central permission gate for handlers
pub struct Authorizer;

impl Authorizer {
    pub fn require<U: UserContext>(user: &U, permission: &str) -> Result<(), WbError> {
        if user.allowed(permission) {
            Ok(())
        } else {
            tracing::debug!(user_id = user.id(), permission, "Permission denied");
            Err(WbError::forbidden(format!("Missing permission: {}", permission)))
        }
    }

    /// Either the user themselves or someone holding `permission`
    pub fn require_self_or<U: UserContext>(
        user: &U,
        user_id: &str,
        permission: &str,
    ) -> Result<(), WbError> {
        if user.is(user_id) {
            Ok(())
        } else {
            Self::require(user, permission)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wb_models::permissions;

    #[test]
    fn test_from_claims() {
        let claims = Claims {
            sub: "u-1".into(),
            role: Role::Manager,
            exp: 0,
            iat: 0,
            jti: None,
            iss: None,
            email: Some("ada@example.com".into()),
            name: None,
        };
        let user = CurrentUser::from(claims);
        assert_eq!(user.id(), "u-1");
        assert!(user.allowed(permissions::VIEW_TEAM_DASHBOARD));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_require() {
        let employee = CurrentUser::new("u-1", Role::Employee);
        let admin = CurrentUser::new("a-1", Role::Admin);

        assert!(Authorizer::require(&admin, permissions::MANAGE_USERS).is_ok());
        assert!(matches!(
            Authorizer::require(&employee, permissions::MANAGE_PROJECTS),
            Err(WbError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_require_self_or() {
        let employee = CurrentUser::new("u-1", Role::Employee);
        assert!(Authorizer::require_self_or(&employee, "u-1", permissions::VIEW_USERS).is_ok());
        assert!(Authorizer::require_self_or(&employee, "u-2", permissions::VIEW_USERS).is_err());
    }
}
