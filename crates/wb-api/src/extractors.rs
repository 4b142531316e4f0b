//! Application state and axum extractors for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts, Path, Query},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use wb_auth::{Authenticator, CurrentUser, JwtService, RequestHeaders};
use wb_core::clock::Clock;
use wb_core::config::InstanceConfig;
use wb_core::pagination::PaginationParams;
use wb_db::Store;
use wb_models::WorkItemStatus;
use wb_services::{ServiceContext, ServiceSettings};

use crate::error::ApiError;

/// Hook for counting lifecycle events; the server wires its metrics in here
pub trait LifecycleObserver: Send + Sync {
    fn transition(&self, _from: WorkItemStatus, _to: WorkItemStatus, _changed: bool) {}

    fn transition_conflict(&self) {}

    /// A request recomputed assignee scores
    fn rescored(&self) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {}

/// Settings the API itself reads
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub app_title: String,
    pub default_page_size: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            app_title: "WorkBoard".into(),
            default_page_size: wb_core::pagination::DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<&InstanceConfig> for ApiConfig {
    fn from(instance: &InstanceConfig) -> Self {
        Self {
            app_title: instance.app_title.clone(),
            default_page_size: instance.default_page_size,
        }
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub authenticator: Authenticator,
    pub settings: Arc<ServiceSettings>,
    pub config: Arc<ApiConfig>,
    pub observer: Arc<dyn LifecycleObserver>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        jwt: Arc<JwtService>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store,
            clock,
            authenticator: Authenticator::new(jwt),
            settings: Arc::new(settings),
            config: Arc::new(ApiConfig::default()),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Service context acting as `user`
    pub fn ctx<'a>(&'a self, user: &'a CurrentUser) -> ServiceContext<'a, CurrentUser> {
        ServiceContext::new(user, self.store.as_ref(), self.clock.as_ref(), &self.settings)
    }
}

/// Authenticated user extractor
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let headers = RequestHeaders::from_header_map(&parts.headers);

        let user = app_state
            .authenticator
            .authenticate(&headers)
            .map_err(|err| ApiError::unauthorized(err.to_string()))?;
        Ok(AuthenticatedUser(user))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageQuery {
    offset: Option<i64>,
    page_size: Option<i64>,
}

/// `offset` / `pageSize` query parameters, clamped to the allowed range
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub wb_db::Pagination);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state).await?;

        let params = PaginationParams::new(
            query.offset.unwrap_or(0),
            query.page_size.unwrap_or(app_state.config.default_page_size),
        );
        Ok(Pagination(params.into()))
    }
}

impl std::ops::Deref for Pagination {
    type Target = wb_db::Pagination;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// JSON body whose rejections render as API errors
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections render as API errors
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `application/hal+json` response body
pub struct HalResponse<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for HalResponse<T> {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, HAL_JSON)],
            Json(self.0),
        )
            .into_response()
    }
}

pub const HAL_JSON: &str = "application/hal+json; charset=utf-8";
