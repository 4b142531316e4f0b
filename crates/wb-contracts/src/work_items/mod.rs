//! Work item contracts
//!
//! Attribute changes go through the create/update contracts; status changes
//! only through [`TransitionContract`].

mod base;
mod create;
mod delete;
mod transition;
mod update;

pub use base::WorkItemBaseContract;
pub use create::CreateWorkItemContract;
pub use delete::DeleteWorkItemContract;
pub use transition::TransitionContract;
pub use update::UpdateWorkItemContract;

/// Attributes a manager may set
pub(crate) const MANAGER_WRITABLE: &[&str] = &[
    "name",
    "description",
    "priority",
    "deadline",
    "comments",
    "project_id",
    "assigned_to_id",
];

/// Attributes the assignee may set on their own item
pub(crate) const ASSIGNEE_WRITABLE: &[&str] = &["description", "comments"];
