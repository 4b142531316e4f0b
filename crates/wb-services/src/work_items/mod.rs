//! Work item services
//!
//! Create, update and delete mirror the usual service-object shape; status
//! changes go through [`TransitionWorkItemService`] only.

mod create;
mod delete;
mod query;
mod set_attributes;
mod transition;
mod update;

pub use create::CreateWorkItemService;
pub use delete::DeleteWorkItemService;
pub use query::WorkItemQueryService;
pub use transition::{TransitionOutcome, TransitionWorkItemService};
pub use update::UpdateWorkItemService;

use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_models::WorkItem;

/// A client-supplied version must match the stored one
pub(crate) fn check_lock_version(item: &WorkItem, expected: Option<i32>) -> WbResult<()> {
    match expected {
        Some(expected) if expected != item.lock_version => Err(WbError::conflict(format!(
            "WorkItem {} has version {}, not {}",
            item.id.unwrap_or_default(),
            item.lock_version,
            expected
        ))),
        _ => Ok(()),
    }
}
