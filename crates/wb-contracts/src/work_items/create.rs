//! Create contract for work items

use wb_core::error::ValidationErrors;
use wb_models::{permissions, WorkItem, WorkItemStatus};

use super::base::WorkItemBaseContract;
use super::MANAGER_WRITABLE;
use crate::base::{AuthorizationResult, Contract, Forbidden, UserContext, ValidationResult};

/// Contract for creating a new work item
pub struct CreateWorkItemContract<'a, U: UserContext> {
    user: &'a U,
    base: WorkItemBaseContract,
}

impl<'a, U: UserContext> CreateWorkItemContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self {
            user,
            base: WorkItemBaseContract::new(),
        }
    }

    /// New items always start the lifecycle
    fn validate_initial_status(&self, item: &WorkItem, errors: &mut ValidationErrors) {
        if item.status != WorkItemStatus::ToDo {
            errors.add("status", "must be ToDo for a new work item");
        }
    }
}

impl<'a, U: UserContext> Contract<WorkItem> for CreateWorkItemContract<'a, U> {
    fn validate(&self, item: &WorkItem) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if let Err(base_errors) = self.base.validate(item) {
            errors.merge(base_errors);
        }
        self.validate_initial_status(item, &mut errors);

        errors.into_result()
    }

    fn authorize(&self, _item: &WorkItem) -> AuthorizationResult {
        if self.user.allowed(permissions::MANAGE_WORK_ITEMS) {
            Ok(())
        } else {
            Err(Forbidden::new("You are not authorized to create work items"))
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        MANAGER_WRITABLE.contains(&attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::TestUser;
    use chrono::{TimeZone, Utc};
    use wb_core::error::WbError;
    use wb_models::Role;

    fn item() -> WorkItem {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        WorkItem::new("Write docs", 1, "u-1", "m-1", now)
    }

    #[test]
    fn test_manager_can_create() {
        let user = TestUser::new("m-1", Role::Manager);
        assert!(CreateWorkItemContract::new(&user).check(&item()).is_ok());
    }

    #[test]
    fn test_employee_cannot_create() {
        let user = TestUser::new("u-1", Role::Employee);
        assert!(matches!(
            CreateWorkItemContract::new(&user).check(&item()),
            Err(WbError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_cannot_create_past_todo() {
        let user = TestUser::new("m-1", Role::Manager);
        let mut item = item();
        item.status = WorkItemStatus::Done;
        let errors = CreateWorkItemContract::new(&user).validate(&item).unwrap_err();
        assert!(errors.has_error("status"));
    }

    #[test]
    fn test_status_is_not_writable() {
        let user = TestUser::new("m-1", Role::Manager);
        assert!(!CreateWorkItemContract::new(&user).is_writable("status"));
    }
}
