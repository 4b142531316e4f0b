//! User and profile API handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use wb_core::traits::UserId;
use wb_models::{ChangeRoleDto, NewUser, UpdateProfileDto};
use wb_services::{ChangeRoleService, RegisterUserService, UpdateProfileService, UserAccount, UserQueryService};

use crate::error::{from_service, ApiResult};
use crate::extractors::{ApiJson, ApiPath, AppState, AuthenticatedUser, HalResponse, Pagination};
use crate::representers::{ProfileRepresenter, UserRepresenter};

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Pagination(pagination): Pagination,
) -> ApiResult<impl IntoResponse> {
    let page = UserQueryService::new(state.ctx(&user)).list(pagination).await?;
    Ok(HalResponse(UserRepresenter::represent_collection(page)))
}

/// POST /api/users
///
/// Registers a user already known to the identity provider, creating the
/// profile in the same step.
pub async fn register_user(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(params): ApiJson<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let account = from_service(RegisterUserService::new(state.ctx(&user)).call(params).await)?;
    Ok((StatusCode::CREATED, HalResponse(UserRepresenter::represent(account))))
}

/// GET /api/users/me
pub async fn get_me(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let account = UserQueryService::new(state.ctx(&user)).me().await?;
    Ok(HalResponse(UserRepresenter::represent(account)))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
) -> ApiResult<impl IntoResponse> {
    let account = UserQueryService::new(state.ctx(&user)).get(&user_id).await?;
    Ok(HalResponse(UserRepresenter::represent(account)))
}

/// PATCH /api/users/:id/role
pub async fn change_role(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(dto): ApiJson<ChangeRoleDto>,
) -> ApiResult<impl IntoResponse> {
    let updated = from_service(ChangeRoleService::new(state.ctx(&user)).call(&user_id, dto).await)?;
    Ok(HalResponse(UserRepresenter::represent(UserAccount {
        user: updated,
        profile: None,
    })))
}

/// GET /api/users/:id/profile
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
) -> ApiResult<impl IntoResponse> {
    let profile = UserQueryService::new(state.ctx(&user)).profile(&user_id).await?;
    Ok(HalResponse(ProfileRepresenter::represent(profile)))
}

/// PATCH /api/users/:id/profile
///
/// Performance, workload and accepted count belong to the scorer and are
/// refused with 422.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(dto): ApiJson<UpdateProfileDto>,
) -> ApiResult<impl IntoResponse> {
    let profile = from_service(UpdateProfileService::new(state.ctx(&user)).call(&user_id, dto).await)?;
    Ok(HalResponse(ProfileRepresenter::represent(profile)))
}
