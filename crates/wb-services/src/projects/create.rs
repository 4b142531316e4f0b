//! Create Service for Projects

use wb_contracts::projects::CreateProjectContract;
use wb_contracts::UserContext;
use wb_core::result::WbResult;
use wb_models::{CreateProjectDto, Project};

use super::set_attributes;
use crate::base::{run_contract, ServiceContext};
use crate::result::ServiceResult;

pub struct CreateProjectService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> CreateProjectService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    pub async fn call(self, dto: CreateProjectDto) -> ServiceResult<Project> {
        self.create(dto).await.into()
    }

    async fn create(&self, dto: CreateProjectDto) -> WbResult<Project> {
        let now = self.ctx.now();
        let (mut project, errors) = set_attributes::build(&dto, self.ctx.user.id(), now.date_naive());
        run_contract(&CreateProjectContract::new(self.ctx.user), &project, errors)?;

        project.created_at = Some(now);
        project.updated_at = Some(now);

        let mut tx = self.ctx.store.begin().await?;
        let project = tx.insert_project(&project).await?;
        tx.commit().await?;

        tracing::info!(project_id = project.id, name = %project.name, "Project created");
        Ok(project)
    }
}
