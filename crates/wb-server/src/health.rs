//! Health checks
//!
//! The only component is the store. Reports are cached for
//! `server.health_cache_seconds` so probes do not hammer the database.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use wb_core::config::ServerConfig;
use wb_db::Store;

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Overall health report
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Health checker configuration
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Timeout for individual health checks
    pub check_timeout: Duration,
    /// Cache duration for health results
    pub cache_duration: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            cache_duration: Duration::from_secs(5),
        }
    }
}

impl From<&ServerConfig> for HealthConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            cache_duration: Duration::from_secs(server.health_cache_seconds),
            ..Self::default()
        }
    }
}

struct CachedHealth {
    report: HealthReport,
    cached_at: Instant,
}

/// Health checker service
pub struct HealthChecker {
    store: Arc<dyn Store>,
    config: HealthConfig,
    start_time: Instant,
    cache: RwLock<Option<CachedHealth>>,
}

impl HealthChecker {
    pub fn new(store: Arc<dyn Store>, config: HealthConfig) -> Self {
        Self {
            store,
            config,
            start_time: Instant::now(),
            cache: RwLock::new(None),
        }
    }

    /// Get cached health or perform checks
    pub async fn check(&self) -> HealthReport {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.cached_at.elapsed() < self.config.cache_duration {
                    debug!("Returning cached health report");
                    return cached.report.clone();
                }
            }
        }

        let report = self.perform_checks().await;

        let mut cache = self.cache.write().await;
        *cache = Some(CachedHealth {
            report: report.clone(),
            cached_at: Instant::now(),
        });
        report
    }

    async fn perform_checks(&self) -> HealthReport {
        let store = self.check_store().await;
        let status = store.status;

        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components: vec![store],
            timestamp: chrono::Utc::now(),
        }
    }

    async fn check_store(&self) -> ComponentHealth {
        let start = Instant::now();

        let (status, message) = match tokio::time::timeout(self.config.check_timeout, self.store.ping()).await {
            Ok(Ok(())) => (HealthStatus::Healthy, "Connected".to_string()),
            Ok(Err(e)) => {
                warn!(error = %e, "Store health check failed");
                (HealthStatus::Unhealthy, e.to_string())
            }
            Err(_) => {
                warn!(timeout_ms = self.config.check_timeout.as_millis() as u64, "Store health check timed out");
                (HealthStatus::Unhealthy, "Timed out".to_string())
            }
        };

        ComponentHealth {
            name: "store".to_string(),
            status,
            message: Some(message),
            response_time_ms: start.elapsed().as_millis() as u64,
            details: Some(serde_json::json!({ "backend": self.store.backend() })),
        }
    }
}

/// Liveness probe; answers as long as the process serves requests
pub async fn liveness() -> &'static str {
    "OK"
}

/// Readiness probe
pub async fn readiness(State(health): State<Arc<HealthChecker>>) -> (StatusCode, Json<HealthReport>) {
    let report = health.check().await;
    (report.http_status(), Json(report))
}

/// Full health report
pub async fn health(State(health): State<Arc<HealthChecker>>) -> (StatusCode, Json<HealthReport>) {
    let report = health.check().await;
    (report.http_status(), Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wb_db::MemoryStore;

    #[tokio::test]
    async fn test_health_check() {
        let checker = HealthChecker::new(Arc::new(MemoryStore::new()), HealthConfig::default());
        let report = checker.check().await;

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.components[0].name, "store");
        assert_eq!(report.components[0].details, Some(serde_json::json!({ "backend": "memory" })));
    }

    #[tokio::test]
    async fn test_offline_store_is_unhealthy() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let checker = HealthChecker::new(store, HealthConfig::default());

        let report = checker.check().await;
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_cache() {
        let store = Arc::new(MemoryStore::new());
        let checker = HealthChecker::new(
            store.clone(),
            HealthConfig {
                cache_duration: Duration::from_secs(60),
                ..Default::default()
            },
        );

        let first = checker.check().await;
        store.set_offline(true);
        let second = checker.check().await;

        assert_eq!(first.timestamp, second.timestamp);
        assert_eq!(second.status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_expired_cache_is_refreshed() {
        let store = Arc::new(MemoryStore::new());
        let checker = HealthChecker::new(
            store.clone(),
            HealthConfig {
                cache_duration: Duration::ZERO,
                ..Default::default()
            },
        );

        checker.check().await;
        store.set_offline(true);
        assert_eq!(checker.check().await.status, HealthStatus::Unhealthy);
    }
}
