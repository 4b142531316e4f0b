//! Delete contract for work items

use wb_models::{permissions, WorkItem};

use crate::base::{AuthorizationResult, Contract, Forbidden, UserContext, ValidationResult};

/// Contract for deleting a work item
pub struct DeleteWorkItemContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> DeleteWorkItemContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<WorkItem> for DeleteWorkItemContract<'a, U> {
    fn validate(&self, _item: &WorkItem) -> ValidationResult {
        Ok(())
    }

    fn authorize(&self, _item: &WorkItem) -> AuthorizationResult {
        if self.user.allowed(permissions::MANAGE_WORK_ITEMS) {
            Ok(())
        } else {
            Err(Forbidden::new("You are not authorized to delete work items"))
        }
    }
}
