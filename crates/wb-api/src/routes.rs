//! API routes

use axum::{
    extract::State,
    routing::{get, patch},
    Router,
};
use serde::Serialize;

use crate::extractors::{AppState, HalResponse};
use crate::handlers::{dashboard, projects, users, work_items};
use crate::representers::{HalLink, HalResource};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api", api_router())
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/projects", projects_router())
        .nest("/workitems", work_items_router())
        .nest("/users", users_router())
        .nest("/dashboard", dashboard_router())
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route(
            "/:id",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/:id/workitems", get(work_items::list_project_work_items))
}

fn work_items_router() -> Router<AppState> {
    Router::new()
        .route("/", get(work_items::list_work_items).post(work_items::create_work_item))
        .route(
            "/:id",
            get(work_items::get_work_item)
                .patch(work_items::update_work_item)
                .delete(work_items::delete_work_item),
        )
        .route("/:id/status", patch(work_items::transition_work_item))
}

fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::register_user))
        .route("/me", get(users::get_me))
        .route("/:id", get(users::get_user))
        .route("/:id/role", patch(users::change_role))
        .route("/:id/profile", get(users::get_profile).patch(users::update_profile))
}

fn dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/manager", get(dashboard::manager_dashboard))
        .route("/employee", get(dashboard::employee_dashboard))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoot {
    instance_name: String,
}

async fn api_root(State(state): State<AppState>) -> HalResponse<HalResource<ApiRoot>> {
    let root = ApiRoot {
        instance_name: state.config.app_title.clone(),
    };
    HalResponse(
        HalResource::new("Root", root)
            .with_self_link("/api")
            .with_link("projects", HalLink::new("/api/projects"))
            .with_link("workItems", HalLink::new("/api/workitems"))
            .with_link("users", HalLink::new("/api/users"))
            .with_link("me", HalLink::new("/api/users/me"))
            .with_link("managerDashboard", HalLink::new("/api/dashboard/manager"))
            .with_link("employeeDashboard", HalLink::new("/api/dashboard/employee")),
    )
}
