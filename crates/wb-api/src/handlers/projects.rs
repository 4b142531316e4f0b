//! Project API handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use wb_contracts::UserContext;
use wb_core::traits::Id;
use wb_models::{permissions, CreateProjectDto, UpdateProjectDto};
use wb_services::{CreateProjectService, DeleteProjectService, ProjectQueryService, UpdateProjectService};

use crate::error::{from_service, ApiResult};
use crate::extractors::{ApiJson, ApiPath, AppState, AuthenticatedUser, HalResponse, Pagination};
use crate::representers::ProjectRepresenter;

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Pagination(pagination): Pagination,
) -> ApiResult<impl IntoResponse> {
    let page = ProjectQueryService::new(state.ctx(&user)).list(pagination).await?;
    let can_manage = user.allowed(permissions::MANAGE_PROJECTS);
    Ok(HalResponse(ProjectRepresenter::represent_collection(page, can_manage)))
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    let project = ProjectQueryService::new(state.ctx(&user)).get(id).await?;
    let can_manage = user.allowed(permissions::MANAGE_PROJECTS);
    Ok(HalResponse(ProjectRepresenter::represent(project, can_manage)))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(dto): ApiJson<CreateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    let project = from_service(CreateProjectService::new(state.ctx(&user)).call(dto).await)?;
    Ok((
        StatusCode::CREATED,
        HalResponse(ProjectRepresenter::represent(project, true)),
    ))
}

/// PATCH /api/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(dto): ApiJson<UpdateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    let project = from_service(UpdateProjectService::new(state.ctx(&user)).call(id, dto).await)?;
    Ok(HalResponse(ProjectRepresenter::represent(project, true)))
}

/// DELETE /api/projects/:id
///
/// Removes the project's work items with it.
pub async fn delete_project(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<impl IntoResponse> {
    from_service(DeleteProjectService::new(state.ctx(&user)).call(id).await)?;
    Ok(StatusCode::NO_CONTENT)
}
