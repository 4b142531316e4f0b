//! Delete contract for projects
//!
//! Deletion cascades to the project's work items.

use wb_models::{permissions, Project};

use crate::base::{AuthorizationResult, Contract, Forbidden, UserContext, ValidationResult};

/// Contract for deleting a project
pub struct DeleteProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> DeleteProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for DeleteProjectContract<'a, U> {
    fn validate(&self, _project: &Project) -> ValidationResult {
        Ok(())
    }

    fn authorize(&self, _project: &Project) -> AuthorizationResult {
        if self.user.allowed(permissions::MANAGE_PROJECTS) {
            Ok(())
        } else {
            Err(Forbidden::new("You are not authorized to delete this project"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::TestUser;
    use chrono::NaiveDate;
    use wb_models::Role;

    #[test]
    fn test_only_managers_and_admins_delete() {
        let project = Project::new(
            "Apollo",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            "m-1",
        );

        for (role, allowed) in [(Role::Employee, false), (Role::Manager, true), (Role::Admin, true)] {
            let user = TestUser::new("x", role);
            assert_eq!(DeleteProjectContract::new(&user).check(&project).is_ok(), allowed);
        }
    }
}
