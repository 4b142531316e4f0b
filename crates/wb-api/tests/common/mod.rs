#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use wb_api::AppState;
use wb_auth::JwtService;
use wb_core::clock::FixedClock;
use wb_db::{MemoryStore, Store};
use wb_models::{Role, User, UserProfile};
use wb_services::ServiceSettings;

const SECRET: &[u8] = b"api-test-secret-key-of-32-bytes!";

/// Router over an in-memory store with `a-1` (Admin), `m-1` (Manager) and
/// `u-1` (Employee) registered
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    jwt: Arc<JwtService>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap(),
        ));
        let jwt = Arc::new(JwtService::new(SECRET));
        let state = AppState::new(
            store.clone(),
            clock.clone(),
            jwt.clone(),
            ServiceSettings::default(),
        );
        let app = Self {
            router: wb_api::router().with_state(state),
            store,
            clock,
            jwt,
        };

        let mut tx = app.store.begin().await.unwrap();
        tx.insert_user(&User::new("a-1", "admin@example.com", "admin").with_role(Role::Admin))
            .await
            .unwrap();
        tx.insert_profile(&UserProfile::new("a-1", "Admin")).await.unwrap();
        tx.commit().await.unwrap();

        for (id, role) in [("m-1", "Manager"), ("u-1", "Employee")] {
            let response = app
                .post(
                    "/api/users",
                    Role::Admin,
                    "a-1",
                    json!({
                        "id": id,
                        "email": format!("{}@example.com", id),
                        "userName": id,
                        "role": role,
                    }),
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        }
        app
    }

    pub fn token(&self, user_id: &str, role: Role) -> String {
        self.jwt.create_token(user_id, role, None, None).unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<String>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, role: Role, user_id: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(self.token(user_id, role)), None).await
    }

    pub async fn post(&self, uri: &str, role: Role, user_id: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(self.token(user_id, role)), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, role: Role, user_id: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(self.token(user_id, role)), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, role: Role, user_id: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(self.token(user_id, role)), None).await
    }

    /// Project P1 created by the manager; returns its id
    pub async fn create_project(&self) -> i64 {
        let response = self
            .post(
                "/api/projects",
                Role::Manager,
                "m-1",
                json!({
                    "name": "P1",
                    "startDate": "2024-01-01",
                    "deadline": "2024-02-01",
                    "priority": "Medium",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    /// Work item assigned to `u-1`; returns the created body
    pub async fn create_work_item(&self, project_id: i64) -> Value {
        let response = self
            .post(
                "/api/workitems",
                Role::Manager,
                "m-1",
                json!({
                    "name": "W1",
                    "projectId": project_id,
                    "assignedToId": "u-1",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    /// Status change carrying the item's current `lockVersion`
    pub async fn set_status(&self, id: i64, status: &str, role: Role, user_id: &str) -> TestResponse {
        let current = self.get(&format!("/api/workitems/{}", id), Role::Admin, "a-1").await;
        self.patch(
            &format!("/api/workitems/{}/status", id),
            role,
            user_id,
            json!({ "status": status, "lockVersion": current.body["lockVersion"] }),
        )
        .await
    }
}
