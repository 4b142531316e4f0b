//! Work item API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use wb_contracts::parse_attribute;
use wb_core::error::{ValidationErrors, WbError};
use wb_core::traits::{Id, UserId};
use wb_db::WorkItemFilter;
use wb_models::{CreateWorkItemDto, TransitionDto, UpdateWorkItemDto, WorkItemStatus};
use wb_services::{
    CreateWorkItemService, DeleteWorkItemService, TransitionWorkItemService, UpdateWorkItemService,
    WorkItemQueryService,
};

use crate::error::{from_service, ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiPath, AppState, AuthenticatedUser, HalResponse, Pagination};
use crate::representers::work_item::WORK_ITEMS_PATH;
use crate::representers::WorkItemRepresenter;

/// Filters accepted by the work item listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemQuery {
    pub project_id: Option<Id>,
    pub assigned_to_id: Option<UserId>,
    pub status: Option<String>,
    #[serde(default)]
    pub open_only: bool,
    pub deadline_before: Option<DateTime<Utc>>,
    pub deadline_after: Option<DateTime<Utc>>,
}

impl WorkItemQuery {
    pub fn into_filter(self) -> Result<WorkItemFilter, ApiError> {
        let mut errors = ValidationErrors::new();
        let status = self
            .status
            .as_deref()
            .and_then(|raw| parse_attribute::<WorkItemStatus>("status", raw, &mut errors));
        errors.into_result().map_err(ApiError::Validation)?;

        Ok(WorkItemFilter {
            project_id: self.project_id,
            assigned_to_id: self.assigned_to_id,
            status,
            open_only: self.open_only,
            deadline_before: self.deadline_before,
            deadline_after: self.deadline_after,
        })
    }
}

/// GET /api/workitems
///
/// Employees only ever see their own items, whatever the filter says.
pub async fn list_work_items(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Pagination(pagination): Pagination,
    Query(query): Query<WorkItemQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    let page = WorkItemQueryService::new(state.ctx(&user))
        .list(filter, pagination)
        .await?;
    Ok(HalResponse(WorkItemRepresenter::represent_collection(
        page,
        &user,
        WORK_ITEMS_PATH,
    )))
}

/// GET /api/projects/:id/workitems
pub async fn list_project_work_items(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(project_id): ApiPath<Id>,
    Pagination(pagination): Pagination,
    Query(query): Query<WorkItemQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    let page = WorkItemQueryService::new(state.ctx(&user))
        .list_for_project(project_id, filter, pagination)
        .await?;
    let base_url = format!("/api/projects/{}/workitems", project_id);
    Ok(HalResponse(WorkItemRepresenter::represent_collection(
        page, &user, &base_url,
    )))
}

/// GET /api/workitems/:id
pub async fn get_work_item(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let item = WorkItemQueryService::new(state.ctx(&user)).get(id).await?;
    Ok(HalResponse(WorkItemRepresenter::represent(item, &user)))
}

/// POST /api/workitems
pub async fn create_work_item(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(dto): ApiJson<CreateWorkItemDto>,
) -> ApiResult<impl IntoResponse> {
    let item = from_service(CreateWorkItemService::new(state.ctx(&user)).call(dto).await)?;
    state.observer.rescored();
    Ok((
        StatusCode::CREATED,
        HalResponse(WorkItemRepresenter::represent(item, &user)),
    ))
}

/// PATCH /api/workitems/:id
pub async fn update_work_item(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(dto): ApiJson<UpdateWorkItemDto>,
) -> ApiResult<impl IntoResponse> {
    let item = from_service(UpdateWorkItemService::new(state.ctx(&user)).call(id, dto).await)?;
    state.observer.rescored();
    Ok(HalResponse(WorkItemRepresenter::represent(item, &user)))
}

/// PATCH /api/workitems/:id/status
///
/// Body: `{"status": "Review", "lockVersion": 3}`; `lockVersion` is required.
/// Requesting the current status answers 200 without touching the item.
pub async fn transition_work_item(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(dto): ApiJson<TransitionDto>,
) -> ApiResult<impl IntoResponse> {
    let result = TransitionWorkItemService::new(state.ctx(&user)).call(id, dto).await;
    if matches!(result.error(), Some(WbError::Conflict { .. })) {
        state.observer.transition_conflict();
    }

    let outcome = from_service(result)?;
    state
        .observer
        .transition(outcome.from, outcome.item.status, outcome.changed);
    if outcome.profile.is_some() {
        state.observer.rescored();
    }
    tracing::debug!(
        work_item_id = id,
        user_id = %user.id,
        from = %outcome.from,
        to = %outcome.item.status,
        changed = outcome.changed,
        "Transition request served"
    );
    Ok(HalResponse(WorkItemRepresenter::represent(outcome.item, &user)))
}

/// DELETE /api/workitems/:id
pub async fn delete_work_item(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    from_service(DeleteWorkItemService::new(state.ctx(&user)).call(id).await)?;
    state.observer.rescored();
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_into_filter() {
        let query = WorkItemQuery {
            status: Some("Review".into()),
            project_id: Some(2),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.status, Some(WorkItemStatus::Review));
        assert_eq!(filter.project_id, Some(2));
    }

    #[test]
    fn test_unknown_status_filter_is_rejected() {
        let query = WorkItemQuery {
            status: Some("Archived".into()),
            ..Default::default()
        };
        match query.into_filter() {
            Err(ApiError::Validation(errors)) => assert!(errors.has_error("status")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
