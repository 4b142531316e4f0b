//! Project services

mod create;
mod delete;
mod set_attributes;
mod update;

pub use create::CreateProjectService;
pub use delete::DeleteProjectService;
pub use update::UpdateProjectService;

use wb_contracts::UserContext;
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_core::traits::Id;
use wb_db::{PaginatedResult, Pagination};
use wb_models::{permissions, Entity, Project};

use crate::base::ServiceContext;

/// Read access to projects
pub struct ProjectQueryService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> ProjectQueryService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    fn authorize(&self) -> WbResult<()> {
        if self.ctx.user.allowed(permissions::VIEW_PROJECTS) {
            Ok(())
        } else {
            Err(WbError::forbidden("You are not authorized to view projects"))
        }
    }

    pub async fn get(&self, id: Id) -> WbResult<Project> {
        self.authorize()?;
        self.ctx
            .store
            .find_project(id)
            .await?
            .ok_or_else(|| WbError::not_found(Project::TYPE_NAME, "id", id))
    }

    pub async fn list(&self, pagination: Pagination) -> WbResult<PaginatedResult<Project>> {
        self.authorize()?;
        Ok(self.ctx.store.list_projects(pagination).await?)
    }
}
