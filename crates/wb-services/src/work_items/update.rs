//! Update Service for Work Items

use wb_contracts::work_items::UpdateWorkItemContract;
use wb_contracts::{ChangeTracker, UserContext};
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_core::traits::Id;
use wb_models::{Entity, UpdateWorkItemDto, WorkItem};

use super::{check_lock_version, set_attributes};
use crate::base::{require_assignee, run_contract, ServiceContext};
use crate::result::ServiceResult;

/// Edits the attributes of a work item; the status is off limits here
pub struct UpdateWorkItemService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> UpdateWorkItemService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    pub async fn call(self, id: Id, dto: UpdateWorkItemDto) -> ServiceResult<WorkItem> {
        self.update(id, dto).await.into()
    }

    async fn update(&self, id: Id, dto: UpdateWorkItemDto) -> WbResult<WorkItem> {
        let now = self.ctx.now();
        let mut tx = self.ctx.store.begin().await?;
        let original = tx
            .find_work_item_for_update(id)
            .await?
            .ok_or_else(|| WbError::not_found(WorkItem::TYPE_NAME, "id", id))?;

        let mut item = original.clone();
        let mut changes = ChangeTracker::new();
        let errors = set_attributes::apply(&mut item, &dto, &mut changes);
        let contract = UpdateWorkItemContract::new(self.ctx.user, &original).with_changes(changes.clone());
        run_contract(&contract, &item, errors)?;
        check_lock_version(&original, dto.lock_version)?;

        if changes.changed_attributes().is_empty() {
            return Ok(original);
        }
        if changes.is_changed("assigned_to_id") {
            require_assignee(&mut *tx, &item).await?;
        }

        item.updated_at = Some(now);
        let item = tx.update_work_item(&item).await?;

        let scorer = self.ctx.scorer();
        scorer.rescore(&mut *tx, &item.assigned_to_id, None, now).await?;
        if original.assigned_to_id != item.assigned_to_id {
            scorer
                .rescore(&mut *tx, &original.assigned_to_id, None, now)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(
            work_item_id = id,
            lock_version = item.lock_version,
            changed = ?changes.changed_attributes(),
            "Work item updated"
        );
        Ok(item)
    }
}
