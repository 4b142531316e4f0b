//! Project contracts

mod base;
mod create;
mod delete;
mod update;

pub use base::ProjectBaseContract;
pub use create::CreateProjectContract;
pub use delete::DeleteProjectContract;
pub use update::UpdateProjectContract;

/// Attributes a project manager may set
pub(crate) const WRITABLE_ATTRIBUTES: &[&str] = &[
    "name",
    "description",
    "start_date",
    "deadline",
    "requirements",
    "priority",
    "status",
];
