//! Lifecycle transition contract
//!
//! Legality is checked before authorization: asking for an impossible move is
//! a validation error whoever asks.
//!
//! | move                              | who                                   |
//! |-----------------------------------|---------------------------------------|
//! | ToDo -> InProgress -> Review      | the assignee, or any reviewer         |
//! | Review -> Done/InProgress/Rejected | reviewers                            |
//! | Review -> Done on one's own item  | reviewers who may approve their own   |

use wb_core::error::{ValidationErrors, WbError};
use wb_models::{permissions, WorkItem, WorkItemStatus};

use crate::base::{AuthorizationResult, Contract, Forbidden, UserContext, ValidationResult};

pub struct TransitionContract<'a, U: UserContext> {
    user: &'a U,
    target: WorkItemStatus,
}

impl<'a, U: UserContext> TransitionContract<'a, U> {
    pub fn new(user: &'a U, target: WorkItemStatus) -> Self {
        Self { user, target }
    }

    pub fn target(&self) -> WorkItemStatus {
        self.target
    }

    fn is_reviewer(&self) -> bool {
        self.user.allowed(permissions::REVIEW_WORK_ITEMS)
    }

    /// Whether the user may address this item at all; holds even for a
    /// request that would leave the status unchanged
    pub fn authorize_actor(&self, item: &WorkItem) -> AuthorizationResult {
        if self.user.is(&item.assigned_to_id)
            || self.is_reviewer()
            || self.user.allowed(permissions::VIEW_ALL_WORK_ITEMS)
        {
            Ok(())
        } else {
            Err(Forbidden::new(
                "Only the assignee or a manager can move this work item",
            ))
        }
    }
}

impl<'a, U: UserContext> Contract<WorkItem> for TransitionContract<'a, U> {
    fn validate(&self, item: &WorkItem) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if let Err(invalid) = item.status.check_transition(self.target) {
            errors.add("status", invalid.to_string());
        }

        errors.into_result()
    }

    fn authorize(&self, item: &WorkItem) -> AuthorizationResult {
        if item.status.is_review_decision(self.target) {
            if !self.is_reviewer() {
                return Err(Forbidden::new(
                    "Only a manager can decide on a work item in review",
                ));
            }
            if self.target == WorkItemStatus::Done
                && self.user.is(&item.assigned_to_id)
                && !self.user.allowed(permissions::APPROVE_OWN_WORK_ITEMS)
            {
                return Err(Forbidden::new("You cannot approve your own work item"));
            }
            return Ok(());
        }

        if self.user.is(&item.assigned_to_id) || self.is_reviewer() {
            Ok(())
        } else {
            Err(Forbidden::new(
                "Only the assignee or a manager can move this work item",
            ))
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(attribute, "status" | "comments")
    }

    /// Legality, then authorization
    fn check(&self, item: &WorkItem) -> Result<(), WbError> {
        self.validate(item).map_err(WbError::Validation)?;
        self.authorize(item)?;
        Ok(())
    }
}
