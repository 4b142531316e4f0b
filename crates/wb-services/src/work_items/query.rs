//! Read access to work items, scoped by role
//!
//! Without `view_all_work_items` a user only ever sees items assigned to them.

use wb_contracts::UserContext;
use wb_core::error::WbError;
use wb_core::result::WbResult;
use wb_core::traits::Id;
use wb_db::{PaginatedResult, Pagination, WorkItemFilter};
use wb_models::{permissions, Entity, WorkItem};

use crate::base::ServiceContext;

pub struct WorkItemQueryService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> WorkItemQueryService<'a, U> {
    pub fn new(ctx: ServiceContext<'a, U>) -> Self {
        Self { ctx }
    }

    fn sees_everything(&self) -> bool {
        self.ctx.user.allowed(permissions::VIEW_ALL_WORK_ITEMS)
    }

    pub async fn get(&self, id: Id) -> WbResult<WorkItem> {
        let item = self
            .ctx
            .store
            .find_work_item(id)
            .await?
            .ok_or_else(|| WbError::not_found(WorkItem::TYPE_NAME, "id", id))?;

        if self.sees_everything() || item.is_assigned_to(self.ctx.user.id()) {
            Ok(item)
        } else {
            Err(WbError::forbidden("You can only view work items assigned to you"))
        }
    }

    pub async fn list(
        &self,
        mut filter: WorkItemFilter,
        pagination: Pagination,
    ) -> WbResult<PaginatedResult<WorkItem>> {
        if !self.sees_everything() {
            filter.assigned_to_id = Some(self.ctx.user.id().to_string());
        }
        Ok(self.ctx.store.list_work_items(&filter, pagination).await?)
    }

    pub async fn list_for_project(
        &self,
        project_id: Id,
        filter: WorkItemFilter,
        pagination: Pagination,
    ) -> WbResult<PaginatedResult<WorkItem>> {
        if self.ctx.store.find_project(project_id).await?.is_none() {
            return Err(WbError::not_found("Project", "id", project_id));
        }
        self.list(
            WorkItemFilter {
                project_id: Some(project_id),
                ..filter
            },
            pagination,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{seed_team, Actor, Fixture};
    use crate::work_items::CreateWorkItemService;
    use wb_models::{CreateWorkItemDto, Role};

    async fn seeded() -> (Fixture, Id) {
        let fixture = Fixture::new();
        let project_id = seed_team(&fixture).await;
        let manager = Actor::new("m-1", Role::Manager);
        for assignee in ["u-1", "u-2", "u-2"] {
            CreateWorkItemService::new(fixture.ctx(&manager))
                .call(CreateWorkItemDto {
                    name: format!("Task for {}", assignee),
                    project_id: Some(project_id),
                    assigned_to_id: Some(assignee.into()),
                    ..CreateWorkItemDto::default()
                })
                .await
                .into_result()
                .unwrap();
        }
        (fixture, project_id)
    }

    #[tokio::test]
    async fn test_employee_sees_own_items_only() {
        let (fixture, _) = seeded().await;
        let employee = Actor::new("u-1", Role::Employee);
        let service = WorkItemQueryService::new(fixture.ctx(&employee));

        let page = service
            .list(WorkItemFilter::assigned_to("u-2"), Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.iter().all(|item| item.assigned_to_id == "u-1"));

        assert!(service.get(1).await.is_ok());
        assert!(matches!(service.get(2).await, Err(WbError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_manager_lists_project_items() {
        let (fixture, project_id) = seeded().await;
        let manager = Actor::new("m-1", Role::Manager);
        let service = WorkItemQueryService::new(fixture.ctx(&manager));

        let page = service
            .list_for_project(project_id, WorkItemFilter::default(), Pagination::new(2, 0))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next());

        assert!(matches!(
            service
                .list_for_project(99, WorkItemFilter::default(), Pagination::default())
                .await,
            Err(WbError::NotFound { .. })
        ));
    }
}
