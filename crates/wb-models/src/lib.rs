//! # wb-models
//!
//! Domain models for WorkBoard.
//!
//! Entity structs for projects, work items, users and their profiles, plus the
//! closed enumerations (priority, statuses, roles) that constrain them. Each
//! model implements the core traits from `wb-core` (Entity, Identifiable, etc.)

pub use wb_core::traits::{Entity, Id, Identifiable, Lockable, ProjectScoped, Timestamped, UserId};

pub mod literal;
pub mod priority;
pub mod project;
pub mod role;
pub mod status;
pub mod user;
pub mod work_item;

// Re-exports for convenience
pub use literal::ParseLiteralError;
pub use priority::Priority;
pub use project::{CreateProjectDto, Project, UpdateProjectDto};
pub use role::{permissions, Role};
pub use status::{InvalidTransition, ProjectStatus, WorkItemStatus};
pub use user::model::{ChangeRoleDto, NewUser, User};
pub use user::profile::{UpdateProfileDto, UserProfile};
pub use work_item::{CreateWorkItemDto, TransitionDto, UpdateWorkItemDto, WorkItem};
