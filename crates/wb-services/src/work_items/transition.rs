//! Lifecycle transition service
//!
//! The status change and the assignee's rescore share one store
//! transaction; any failure leaves both untouched. Callers always state the
//! row version they acted on, so the loser of a race sees a conflict rather
//! than the winner's status.

use wb_contracts::work_items::TransitionContract;
use wb_contracts::{parse_attribute, Contract, UserContext};
use wb_core::error::{ValidationErrors, WbError};
use wb_core::result::WbResult;
use wb_core::traits::Id;
use wb_models::{Entity, TransitionDto, UserProfile, WorkItem, WorkItemStatus};

use super::check_lock_version;
use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// What a transition did
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub item: WorkItem,
    pub from: WorkItemStatus,
    /// False when the item already had the requested status
    pub changed: bool,
    /// The assignee's profile after rescoring
    pub profile: Option<UserProfile>,
}

pub struct TransitionWorkItemService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> TransitionWorkItemService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    pub async fn call(self, id: Id, dto: TransitionDto) -> ServiceResult<TransitionOutcome> {
        match self.transition(id, dto).await {
            Ok(outcome) if !outcome.changed => {
                ServiceResult::success_with_message(outcome, "Status unchanged")
            }
            result => result.into(),
        }
    }

    async fn transition(&self, id: Id, dto: TransitionDto) -> WbResult<TransitionOutcome> {
        let mut errors = ValidationErrors::new();
        let target = parse_attribute::<WorkItemStatus>("status", &dto.status, &mut errors)
            .ok_or(WbError::Validation(errors))?;

        let now = self.ctx.now();
        let mut tx = self.ctx.store.begin().await?;
        let item = tx
            .find_work_item_for_update(id)
            .await?
            .ok_or_else(|| WbError::not_found(WorkItem::TYPE_NAME, "id", id))?;
        let from = item.status;
        let contract = TransitionContract::new(self.ctx.user, target);
        contract.authorize_actor(&item)?;

        if from == target {
            tracing::debug!(work_item_id = id, status = %target, "Transition is a no-op");
            return Ok(TransitionOutcome {
                item,
                from,
                changed: false,
                profile: None,
            });
        }

        check_lock_version(&item, Some(dto.lock_version))?;
        contract.check(&item)?;

        let mut next = item.clone();
        next.apply_status(target, now);
        if dto.comments.is_some() {
            next.comments = dto.comments;
        }
        let stored = tx.update_work_item(&next).await?;

        let scorer = self.ctx.scorer();
        let adjustment = scorer.adjustment(from, &stored);
        let profile = scorer
            .rescore(&mut *tx, &stored.assigned_to_id, adjustment, now)
            .await?;
        tx.commit().await?;

        tracing::info!(
            work_item_id = id,
            user_id = %self.ctx.user.id(),
            from = %from,
            to = %target,
            lock_version = stored.lock_version,
            "Work item transitioned"
        );

        Ok(TransitionOutcome {
            item: stored,
            from,
            changed: true,
            profile,
        })
    }
}
