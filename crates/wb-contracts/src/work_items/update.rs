//! Update contract for work items
//!
//! Managers may edit every attribute except the status. The assignee may only
//! touch the description and comments of their own item.

use wb_core::error::ValidationErrors;
use wb_core::traits::UserId;
use wb_models::{permissions, WorkItem};

use super::base::WorkItemBaseContract;
use super::{ASSIGNEE_WRITABLE, MANAGER_WRITABLE};
use crate::base::{
    AuthorizationResult, ChangeTracker, Contract, Forbidden, UserContext, ValidationResult,
};

/// Contract for updating an existing work item
pub struct UpdateWorkItemContract<'a, U: UserContext> {
    user: &'a U,
    base: WorkItemBaseContract,
    /// Assignee before the update
    assignee: UserId,
    changes: ChangeTracker,
}

impl<'a, U: UserContext> UpdateWorkItemContract<'a, U> {
    pub fn new(user: &'a U, original: &WorkItem) -> Self {
        Self {
            user,
            base: WorkItemBaseContract::new(),
            assignee: original.assigned_to_id.clone(),
            changes: ChangeTracker::new(),
        }
    }

    pub fn with_changes(mut self, changes: ChangeTracker) -> Self {
        self.changes = changes;
        self
    }

    fn is_manager(&self) -> bool {
        self.user.allowed(permissions::MANAGE_WORK_ITEMS)
    }
}

impl<'a, U: UserContext> Contract<WorkItem> for UpdateWorkItemContract<'a, U> {
    fn validate(&self, item: &WorkItem) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        for attribute in self.changes.unwritable(|a| self.is_writable(a)) {
            errors.add(attribute, "is not writable");
        }
        if let Err(base_errors) = self.base.validate(item) {
            errors.merge(base_errors);
        }

        errors.into_result()
    }

    fn authorize(&self, _item: &WorkItem) -> AuthorizationResult {
        if self.is_manager() || self.user.is(&self.assignee) {
            Ok(())
        } else {
            Err(Forbidden::new("You are not authorized to edit this work item"))
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        if self.is_manager() {
            MANAGER_WRITABLE.contains(&attribute)
        } else {
            ASSIGNEE_WRITABLE.contains(&attribute)
        }
    }
}
