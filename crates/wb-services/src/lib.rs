//! # wb-services
//!
//! Business logic services for WorkBoard.
//!
//! Each service object takes a [`ServiceContext`] (acting user, store, clock,
//! settings), runs its contract and performs the write together with any
//! profile rescoring inside one store transaction. Results come back as a
//! [`ServiceResult`].

pub mod base;
pub mod dashboard;
pub mod projects;
pub mod result;
pub mod scoring;
pub mod sweeper;
pub mod users;
pub mod work_items;

pub use base::{ServiceContext, ServiceSettings};
pub use dashboard::{DashboardService, EmployeeDashboard, ManagerDashboard};
pub use projects::{CreateProjectService, DeleteProjectService, ProjectQueryService, UpdateProjectService};
pub use result::ServiceResult;
pub use scoring::{Adjustment, Scorer};
pub use sweeper::WorkloadSweeper;
pub use users::{
    ChangeRoleService, RegisterUserService, UpdateProfileService, UserAccount, UserQueryService,
};
pub use work_items::{
    CreateWorkItemService, DeleteWorkItemService, TransitionOutcome, TransitionWorkItemService,
    UpdateWorkItemService, WorkItemQueryService,
};
