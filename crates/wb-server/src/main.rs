//! WorkBoard server
//!
//! Loads configuration, opens the store, and serves the JSON API next to the
//! health and metrics endpoints. The workload sweeper runs alongside the
//! listener and stops with it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wb_api::{ApiConfig, AppState};
use wb_auth::JwtService;
use wb_core::clock::{Clock, SystemClock};
use wb_core::config::{AppConfig, DatabaseConfig, LogFormat, LoggingConfig};
use wb_db::{Database, MemoryStore, PgStore, Store};
use wb_services::{ServiceSettings, WorkloadSweeper};

mod health;
mod metrics;

use health::{HealthChecker, HealthConfig};
use metrics::Metrics;

const DEFAULT_FILTER: &str = "info,wb_server=debug,wb_api=debug,wb_services=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting WorkBoard"
    );

    let store = open_store(&config.database).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let jwt = Arc::new(JwtService::from_config(&config.auth));
    let metrics = Arc::new(Metrics::new());
    let health = Arc::new(HealthChecker::new(
        store.clone(),
        HealthConfig::from(&config.server),
    ));

    let settings = ServiceSettings {
        scoring: config.scoring.clone(),
        dashboard: config.dashboard.clone(),
    };
    let state = AppState::new(store.clone(), clock.clone(), jwt, settings)
        .with_config(ApiConfig::from(&config.instance))
        .with_observer(metrics.clone());

    let app = build_router(
        state,
        health,
        metrics,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(
        WorkloadSweeper::new(store, clock, config.scoring.clone(), shutdown_rx).run(),
    );

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        warn!(error = %e, "Workload sweeper task ended abnormally");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| match logging.filter.as_deref() {
            Some(directives) => EnvFilter::try_new(directives),
            None => EnvFilter::try_new(DEFAULT_FILTER),
        })
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
    }
}

/// `memory://` selects the in-process store; anything else is PostgreSQL
async fn open_store(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn Store>> {
    if config.is_memory() {
        warn!("Using the in-memory store; data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db = Database::connect(config)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    if config.run_migrations {
        db.migrate().await.context("failed to run migrations")?;
        info!("Migrations applied");
    }

    Ok(Arc::new(PgStore::new(db)))
}

/// Build the application router
fn build_router(
    state: AppState,
    health: Arc<HealthChecker>,
    metrics: Arc<Metrics>,
    request_timeout: Duration,
) -> Router {
    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/metrics.json", get(metrics::json_metrics))
        .with_state(metrics.clone());

    Router::new()
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(wb_api::router().with_state(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .layer(middleware::from_fn_with_state(
            metrics,
            metrics::metrics_middleware,
        ))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use tower::ServiceExt;
    use wb_core::clock::FixedClock;
    use wb_models::{Role, User, UserProfile};

    const SECRET: &[u8] = b"server-test-secret-of-32-bytes!!";

    struct Harness {
        app: Router,
        store: Arc<MemoryStore>,
        metrics: Arc<Metrics>,
        jwt: Arc<JwtService>,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap(),
        ));
        let jwt = Arc::new(JwtService::new(SECRET));
        let metrics = Arc::new(Metrics::new());
        let health = Arc::new(HealthChecker::new(
            store.clone(),
            HealthConfig {
                cache_duration: Duration::ZERO,
                ..Default::default()
            },
        ));
        let state = AppState::new(store.clone(), clock, jwt.clone(), ServiceSettings::default())
            .with_observer(metrics.clone());

        Harness {
            app: build_router(state, health, metrics.clone(), Duration::from_secs(30)),
            store,
            metrics,
            jwt,
        }
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, Vec<u8>) {
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

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let h = harness();

        let (status, body) = send(&h.app, Method::GET, "/health/live", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");

        let (status, body) = send(&h.app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let report: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(report["status"], "healthy");
        assert_eq!(report["components"][0]["details"]["backend"], "memory");
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        let h = harness();
        h.store.set_offline(true);

        let (status, body) = send(&h.app, Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let report: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(report["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_api_is_mounted() {
        let h = harness();

        let (status, body) = send(&h.app, Method::GET, "/api", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let root: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(root["_type"], "Root");

        let (status, _) = send(&h.app, Method::GET, "/api/projects", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_metrics_count_requests_and_transitions() {
        let h = harness();

        let mut tx = h.store.begin().await.unwrap();
        tx.insert_user(&User::new("m-1", "m@example.com", "m").with_role(Role::Manager))
            .await
            .unwrap();
        tx.insert_profile(&UserProfile::new("m-1", "Manager")).await.unwrap();
        tx.commit().await.unwrap();
        let token = h.jwt.create_token("m-1", Role::Manager, None, None).unwrap();

        let (status, body) = send(
            &h.app,
            Method::POST,
            "/api/projects",
            Some(&token),
            Some(serde_json::json!({ "name": "P1", "deadline": "2024-02-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let project: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let (status, body) = send(
            &h.app,
            Method::POST,
            "/api/workitems",
            Some(&token),
            Some(serde_json::json!({
                "name": "W1",
                "projectId": project["id"],
                "assignedToId": "m-1",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let item: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let (status, _) = send(
            &h.app,
            Method::PATCH,
            &format!("/api/workitems/{}/status", item["id"]),
            Some(&token),
            Some(serde_json::json!({ "status": "InProgress", "lockVersion": item["lockVersion"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(h.metrics.transitions_to(wb_models::WorkItemStatus::InProgress), 1);

        let (status, body) = send(&h.app, Method::GET, "/metrics", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("workitem_transitions_total 1"));
        assert!(text.contains("http_requests_by_status{status=\"2xx\"} 3"));
    }
}
