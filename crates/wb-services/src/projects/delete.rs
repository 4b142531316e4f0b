//! Delete Service for Projects
//!
//! Work items go with their project; every affected assignee is rescored in
//! the same transaction.

use wb_contracts::projects::DeleteProjectContract;
use wb_contracts::{Contract, UserContext};
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_core::traits::Id;
use wb_db::{assignees, WorkItemFilter};
use wb_models::{Entity, Project};

use crate::base::ServiceContext;
use crate::result::ServiceResult;

pub struct DeleteProjectService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> DeleteProjectService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    /// Returns the deleted project
    pub async fn call(self, id: Id) -> ServiceResult<Project> {
        self.delete(id).await.into()
    }

    async fn delete(&self, id: Id) -> WbResult<Project> {
        let now = self.ctx.now();
        let mut tx = self.ctx.store.begin().await?;
        let project = tx
            .find_project(id)
            .await?
            .ok_or_else(|| WbError::not_found(Project::TYPE_NAME, "id", id))?;

        DeleteProjectContract::new(self.ctx.user).check(&project)?;

        let items = tx.work_items(&WorkItemFilter::for_project(id)).await?;
        let affected = assignees(&items);
        tx.delete_project(id).await?;

        let scorer = self.ctx.scorer();
        for user_id in &affected {
            scorer.rescore(&mut *tx, user_id, None, now).await?;
        }
        tx.commit().await?;

        tracing::info!(
            project_id = id,
            work_items = items.len(),
            rescored = affected.len(),
            "Project deleted"
        );
        Ok(project)
    }
}
