//! Delete Service for Work Items

use wb_contracts::work_items::DeleteWorkItemContract;
use wb_contracts::{Contract, UserContext};
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_core::traits::Id;
use wb_models::{Entity, WorkItem};

use crate::base::ServiceContext;
use crate::result::ServiceResult;

pub struct DeleteWorkItemService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> DeleteWorkItemService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    /// Returns the deleted item
    pub async fn call(self, id: Id) -> ServiceResult<WorkItem> {
        self.delete(id).await.into()
    }

    async fn delete(&self, id: Id) -> WbResult<WorkItem> {
        let now = self.ctx.now();
        let mut tx = self.ctx.store.begin().await?;
        let item = tx
            .find_work_item_for_update(id)
            .await?
            .ok_or_else(|| WbError::not_found(WorkItem::TYPE_NAME, "id", id))?;

        DeleteWorkItemContract::new(self.ctx.user).check(&item)?;

        tx.delete_work_item(id).await?;
        self.ctx
            .scorer()
            .rescore(&mut *tx, &item.assigned_to_id, None, now)
            .await?;
        tx.commit().await?;

        tracing::info!(work_item_id = id, user_id = %self.ctx.user.id(), "Work item deleted");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{seed_team, Actor, Fixture};
    use crate::work_items::CreateWorkItemService;
    use wb_db::Store;
    use wb_models::{CreateWorkItemDto, Role};

    #[tokio::test]
    async fn test_delete_frees_workload() {
        let fixture = Fixture::new();
        let project_id = seed_team(&fixture).await;
        let manager = Actor::new("m-1", Role::Manager);
        let item = CreateWorkItemService::new(fixture.ctx(&manager))
            .call(CreateWorkItemDto {
                name: "Draft API".into(),
                project_id: Some(project_id),
                assigned_to_id: Some("u-1".into()),
                ..CreateWorkItemDto::default()
            })
            .await
            .into_result()
            .unwrap();

        let employee = Actor::new("u-1", Role::Employee);
        let denied = DeleteWorkItemService::new(fixture.ctx(&employee))
            .call(item.id.unwrap())
            .await;
        assert_eq!(denied.failure_status(), Some(403));

        let deleted = DeleteWorkItemService::new(fixture.ctx(&manager))
            .call(item.id.unwrap())
            .await;
        assert!(deleted.is_success());
        assert!(fixture.store.find_work_item(item.id.unwrap()).await.unwrap().is_none());

        let profile = fixture.store.find_profile("u-1").await.unwrap().unwrap();
        assert_eq!(profile.current_workload.to_f64(), 0.0);
    }
}
