//! Dashboard API handlers

use axum::{extract::State, response::IntoResponse};
use wb_services::DashboardService;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, HalResponse};
use crate::representers::DashboardRepresenter;

/// GET /api/dashboard/manager
pub async fn manager_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let dashboard = DashboardService::new(state.ctx(&user)).manager().await?;
    Ok(HalResponse(DashboardRepresenter::manager(dashboard)))
}

/// GET /api/dashboard/employee
pub async fn employee_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let dashboard = DashboardService::new(state.ctx(&user)).employee().await?;
    Ok(HalResponse(DashboardRepresenter::employee(dashboard, &user.id)))
}
