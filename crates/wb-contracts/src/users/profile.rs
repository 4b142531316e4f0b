//! Profile contracts
//!
//! The scorer-owned fields (`performance`, `current_workload`,
//! `accepted_items_count`) are never writable here.

use wb_core::error::ValidationErrors;
use wb_models::{permissions, UserProfile};

use crate::base::{
    validate_derived, validate_presence, AuthorizationResult, ChangeTracker, Contract, Forbidden,
    UserContext, ValidationResult,
};

const WRITABLE_ATTRIBUTES: &[&str] = &["full_name", "skills", "experience_years"];

/// Attribute checks for every profile write
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileBaseContract;

impl ProfileBaseContract {
    pub fn new() -> Self {
        Self
    }
}

impl Contract<UserProfile> for ProfileBaseContract {
    fn validate(&self, profile: &UserProfile) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_derived(profile, &mut errors);
        validate_presence("full_name", &profile.full_name, &mut errors);

        errors.into_result()
    }
}

/// Self-service profile edits, or an administrator editing anyone
pub struct UpdateProfileContract<'a, U: UserContext> {
    user: &'a U,
    base: ProfileBaseContract,
    changes: ChangeTracker,
}

impl<'a, U: UserContext> UpdateProfileContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self {
            user,
            base: ProfileBaseContract::new(),
            changes: ChangeTracker::new(),
        }
    }

    pub fn with_changes(mut self, changes: ChangeTracker) -> Self {
        self.changes = changes;
        self
    }
}

impl<'a, U: UserContext> Contract<UserProfile> for UpdateProfileContract<'a, U> {
    fn validate(&self, profile: &UserProfile) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        for attribute in self.changes.unwritable(|a| self.is_writable(a)) {
            errors.add(attribute, "is not writable");
        }
        if let Err(base_errors) = self.base.validate(profile) {
            errors.merge(base_errors);
        }

        errors.into_result()
    }

    fn authorize(&self, profile: &UserProfile) -> AuthorizationResult {
        if self.user.is(&profile.user_id) || self.user.allowed(permissions::MANAGE_USERS) {
            Ok(())
        } else {
            Err(Forbidden::new("You can only edit your own profile"))
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        WRITABLE_ATTRIBUTES.contains(&attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::TestUser;
    use wb_core::error::WbError;
    use wb_models::Role;

    #[test]
    fn test_owner_edits_profile() {
        let owner = TestUser::new("u-1", Role::Employee);
        let mut changes = ChangeTracker::new();
        changes.mark_changed("skills");
        let contract = UpdateProfileContract::new(&owner).with_changes(changes);
        assert!(contract.check(&UserProfile::new("u-1", "Ada")).is_ok());
    }

    #[test]
    fn test_manager_cannot_edit_someone_else() {
        let manager = TestUser::new("m-1", Role::Manager);
        assert!(matches!(
            UpdateProfileContract::new(&manager).check(&UserProfile::new("u-1", "Ada")),
            Err(WbError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_performance_is_not_writable() {
        let admin = TestUser::new("a-1", Role::Admin);
        let mut changes = ChangeTracker::new();
        changes.mark_changed("performance");
        let errors = UpdateProfileContract::new(&admin)
            .with_changes(changes)
            .validate(&UserProfile::new("u-1", "Ada"))
            .unwrap_err();
        assert!(errors.has_error("performance"));
    }

    #[test]
    fn test_full_name_limits() {
        let mut profile = UserProfile::new("u-1", "x".repeat(101));
        assert!(ProfileBaseContract::new().validate(&profile).is_err());
        profile.full_name = " ".into();
        assert!(ProfileBaseContract::new().validate(&profile).is_err());
    }
}
