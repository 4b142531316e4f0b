//! Role change contract

use wb_core::error::ValidationErrors;
use wb_models::{permissions, Role, User};

use crate::base::{AuthorizationResult, Contract, Forbidden, UserContext, ValidationResult};

pub struct ChangeRoleContract<'a, U: UserContext> {
    user: &'a U,
    new_role: Role,
}

impl<'a, U: UserContext> ChangeRoleContract<'a, U> {
    pub fn new(user: &'a U, new_role: Role) -> Self {
        Self { user, new_role }
    }
}

impl<'a, U: UserContext> Contract<User> for ChangeRoleContract<'a, U> {
    /// An admin may not demote themselves; someone must stay able to manage users
    fn validate(&self, target: &User) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if self.user.is(&target.id) && !self.new_role.has_permission(permissions::MANAGE_USERS) {
            errors.add("role", "cannot be lowered on your own account");
        }

        errors.into_result()
    }

    fn authorize(&self, _target: &User) -> AuthorizationResult {
        if self.user.allowed(permissions::MANAGE_USERS) {
            Ok(())
        } else {
            Err(Forbidden::new("Only administrators can change roles"))
        }
    }
}
