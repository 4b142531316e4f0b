//! Update Service for Projects

use wb_contracts::projects::UpdateProjectContract;
use wb_contracts::{ChangeTracker, UserContext};
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_core::traits::Id;
use wb_models::{Entity, Project, UpdateProjectDto};

use super::set_attributes;
use crate::base::{run_contract, ServiceContext};
use crate::result::ServiceResult;

pub struct UpdateProjectService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> UpdateProjectService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    pub async fn call(self, id: Id, dto: UpdateProjectDto) -> ServiceResult<Project> {
        self.update(id, dto).await.into()
    }

    async fn update(&self, id: Id, dto: UpdateProjectDto) -> WbResult<Project> {
        let mut tx = self.ctx.store.begin().await?;
        let mut project = tx
            .find_project(id)
            .await?
            .ok_or_else(|| WbError::not_found(Project::TYPE_NAME, "id", id))?;

        let mut changes = ChangeTracker::new();
        let errors = set_attributes::apply(&mut project, &dto, &mut changes);
        let contract = UpdateProjectContract::new(self.ctx.user).with_changes(changes.clone());
        run_contract(&contract, &project, errors)?;

        if changes.changed_attributes().is_empty() {
            return Ok(project);
        }

        project.updated_at = Some(self.ctx.now());
        let project = tx.update_project(&project).await?;
        tx.commit().await?;

        tracing::info!(
            project_id = id,
            changed = ?changes.changed_attributes(),
            "Project updated"
        );
        Ok(project)
    }
}
