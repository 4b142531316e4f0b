//! Create contract for projects

use wb_models::{permissions, Project};

use super::base::ProjectBaseContract;
use super::WRITABLE_ATTRIBUTES;
use crate::base::{AuthorizationResult, Contract, Forbidden, UserContext, ValidationResult};

/// Contract for creating a new project
pub struct CreateProjectContract<'a, U: UserContext> {
    user: &'a U,
    base: ProjectBaseContract,
}

impl<'a, U: UserContext> CreateProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self {
            user,
            base: ProjectBaseContract::new(),
        }
    }
}

impl<'a, U: UserContext> Contract<Project> for CreateProjectContract<'a, U> {
    fn validate(&self, project: &Project) -> ValidationResult {
        self.base.validate(project)
    }

    fn authorize(&self, _project: &Project) -> AuthorizationResult {
        if self.user.allowed(permissions::MANAGE_PROJECTS) {
            Ok(())
        } else {
            Err(Forbidden::new("You are not authorized to create projects"))
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
    use chrono::NaiveDate;
    use wb_core::error::WbError;
    use wb_models::Role;

    fn project() -> Project {
        Project::new(
            "Apollo",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            "m-1",
        )
    }

    #[test]
    fn test_manager_can_create() {
        let user = TestUser::new("m-1", Role::Manager);
        assert!(CreateProjectContract::new(&user).check(&project()).is_ok());
    }

    #[test]
    fn test_employee_cannot_create() {
        let user = TestUser::new("e-1", Role::Employee);
        let result = CreateProjectContract::new(&user).check(&project());
        assert!(matches!(result, Err(WbError::Forbidden { .. })));
    }

    #[test]
    fn test_writable_attributes() {
        let user = TestUser::new("m-1", Role::Manager);
        let contract = CreateProjectContract::new(&user);
        assert!(contract.is_writable("priority"));
        assert!(!contract.is_writable("created_by_id"));
    }
}
