//! Create contract for users
//!
//! Registers a user known to the identity provider; the profile is created
//! alongside and checked by [`super::ProfileBaseContract`].

use wb_core::error::ValidationErrors;
use wb_models::{permissions, User};

use crate::base::{
    validate_derived, validate_presence, AuthorizationResult, Contract, Forbidden, UserContext,
    ValidationResult,
};

/// Contract for creating a new user
pub struct CreateUserContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> CreateUserContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<User> for CreateUserContract<'a, U> {
    fn validate(&self, entity: &User) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_presence("id", &entity.id, &mut errors);
        validate_presence("user_name", &entity.user_name, &mut errors);
        validate_derived(entity, &mut errors);

        errors.into_result()
    }

    fn authorize(&self, _entity: &User) -> AuthorizationResult {
        if self.user.allowed(permissions::MANAGE_USERS) {
            Ok(())
        } else {
            Err(Forbidden::new("Only administrators can register users"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::TestUser;
    use wb_core::error::WbError;
    use wb_models::Role;

    #[test]
    fn test_admin_registers_user() {
        let admin = TestUser::new("a-1", Role::Admin);
        let user = User::new("u-9", "grace@example.com", "grace");
        assert!(CreateUserContract::new(&admin).check(&user).is_ok());
    }

    #[test]
    fn test_manager_cannot_register() {
        let manager = TestUser::new("m-1", Role::Manager);
        let user = User::new("u-9", "grace@example.com", "grace");
        assert!(matches!(
            CreateUserContract::new(&manager).check(&user),
            Err(WbError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_invalid_fields() {
        let admin = TestUser::new("a-1", Role::Admin);
        let user = User::new("", "grace", "");
        let errors = CreateUserContract::new(&admin).validate(&user).unwrap_err();
        assert!(errors.has_error("id"));
        assert!(errors.has_error("email"));
        assert!(errors.has_error("user_name"));
    }
}
