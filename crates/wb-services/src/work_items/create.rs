//! Create Service for Work Items

use wb_contracts::work_items::CreateWorkItemContract;
use wb_contracts::UserContext;
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_models::{CreateWorkItemDto, WorkItem};

use super::set_attributes;
use crate::base::{require_assignee, run_contract, ServiceContext};
use crate::result::ServiceResult;

/// Creates a work item and refreshes the assignee's workload
///
/// # Example
/// ```ignore
/// let service = CreateWorkItemService::new(ctx);
/// let result = service.call(dto).await;
/// ```
pub struct CreateWorkItemService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> CreateWorkItemService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    pub async fn call(self, dto: CreateWorkItemDto) -> ServiceResult<WorkItem> {
        self.create(dto).await.into()
    }

    async fn create(&self, dto: CreateWorkItemDto) -> WbResult<WorkItem> {
        let now = self.ctx.now();
        let (item, errors) = set_attributes::build(&dto, self.ctx.user.id(), now);
        run_contract(&CreateWorkItemContract::new(self.ctx.user), &item, errors)?;

        let mut tx = self.ctx.store.begin().await?;
        if tx.find_project(item.project_id).await?.is_none() {
            return Err(WbError::invalid("project_id", "does not exist"));
        }
        require_assignee(&mut *tx, &item).await?;

        let item = tx.insert_work_item(&item).await?;
        self.ctx
            .scorer()
            .rescore(&mut *tx, &item.assigned_to_id, None, now)
            .await?;
        tx.commit().await?;

        tracing::info!(
            work_item_id = item.id,
            project_id = item.project_id,
            user_id = %item.assigned_to_id,
            "Work item created"
        );
        Ok(item)
    }
}
