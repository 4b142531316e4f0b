//! Update contract for projects

use wb_core::error::ValidationErrors;
use wb_models::{permissions, Project};

use super::base::ProjectBaseContract;
use super::WRITABLE_ATTRIBUTES;
use crate::base::{
    AuthorizationResult, ChangeTracker, Contract, Forbidden, UserContext, ValidationResult,
};

/// Contract for updating an existing project
pub struct UpdateProjectContract<'a, U: UserContext> {
    user: &'a U,
    base: ProjectBaseContract,
    changes: ChangeTracker,
}

impl<'a, U: UserContext> UpdateProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self {
            user,
            base: ProjectBaseContract::new(),
            changes: ChangeTracker::new(),
        }
    }

    pub fn with_changes(mut self, changes: ChangeTracker) -> Self {
        self.changes = changes;
        self
    }
}

impl<'a, U: UserContext> Contract<Project> for UpdateProjectContract<'a, U> {
    fn validate(&self, project: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        for attribute in self.changes.unwritable(|a| self.is_writable(a)) {
            errors.add(attribute, "is not writable");
        }
        if let Err(base_errors) = self.base.validate(project) {
            errors.merge(base_errors);
        }

        errors.into_result()
    }

    fn authorize(&self, _project: &Project) -> AuthorizationResult {
        if self.user.allowed(permissions::MANAGE_PROJECTS) {
            Ok(())
        } else {
            Err(Forbidden::new("You are not authorized to edit this project"))
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        WRITABLE_ATTRIBUTES.contains(&attribute)
    }
}
