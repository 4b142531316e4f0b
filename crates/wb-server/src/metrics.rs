//! Metrics and Observability
//!
//! Prometheus-compatible counters for HTTP traffic and the work-item
//! lifecycle. Lifecycle counters are fed through [`LifecycleObserver`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info_span, Instrument};
use wb_api::LifecycleObserver;
use wb_models::WorkItemStatus;

const STATUS_COUNT: usize = WorkItemStatus::ALL.len();

/// Metrics collector
pub struct Metrics {
    /// Total HTTP requests
    pub http_requests_total: AtomicU64,
    /// HTTP requests by status code (2xx, 4xx, 5xx)
    pub http_requests_2xx: AtomicU64,
    pub http_requests_4xx: AtomicU64,
    pub http_requests_5xx: AtomicU64,
    /// Total request duration in milliseconds
    pub http_request_duration_ms_total: AtomicU64,
    /// Requests currently in flight
    pub active_requests: AtomicU64,
    /// Accepted transitions, including idempotent ones
    pub transitions_total: AtomicU64,
    /// Accepted transitions by target status, in `WorkItemStatus::ALL` order
    transitions_to: [AtomicU64; STATUS_COUNT],
    /// Transitions that targeted the current status
    pub transitions_unchanged: AtomicU64,
    /// Transitions rejected by optimistic locking
    pub transition_conflicts: AtomicU64,
    /// Writes that triggered a profile rescore
    pub score_recomputations: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn status_index(status: WorkItemStatus) -> usize {
    WorkItemStatus::ALL
        .iter()
        .position(|s| *s == status)
        .unwrap_or_default()
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            http_requests_total: AtomicU64::new(0),
            http_requests_2xx: AtomicU64::new(0),
            http_requests_4xx: AtomicU64::new(0),
            http_requests_5xx: AtomicU64::new(0),
            http_request_duration_ms_total: AtomicU64::new(0),
            active_requests: AtomicU64::new(0),
            transitions_total: AtomicU64::new(0),
            transitions_to: std::array::from_fn(|_| AtomicU64::new(0)),
            transitions_unchanged: AtomicU64::new(0),
            transition_conflicts: AtomicU64::new(0),
            score_recomputations: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record an HTTP request
    pub fn record_request(&self, status: StatusCode, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_request_duration_ms_total
            .fetch_add(duration_ms, Ordering::Relaxed);

        let code = status.as_u16();
        if (200..300).contains(&code) {
            self.http_requests_2xx.fetch_add(1, Ordering::Relaxed);
        } else if (400..500).contains(&code) {
            self.http_requests_4xx.fetch_add(1, Ordering::Relaxed);
        } else if code >= 500 {
            self.http_requests_5xx.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn request_started(&self) {
        self.active_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_finished(&self) {
        self.active_requests.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn transitions_to(&self, status: WorkItemStatus) -> u64 {
        self.transitions_to[status_index(status)].load(Ordering::Relaxed)
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        counter(
            &mut output,
            "http_requests_total",
            "Total number of HTTP requests",
            self.http_requests_total.load(Ordering::Relaxed),
        );

        output.push_str("# HELP http_requests_by_status HTTP requests by status code range\n");
        output.push_str("# TYPE http_requests_by_status counter\n");
        for (range, value) in [
            ("2xx", &self.http_requests_2xx),
            ("4xx", &self.http_requests_4xx),
            ("5xx", &self.http_requests_5xx),
        ] {
            output.push_str(&format!(
                "http_requests_by_status{{status=\"{}\"}} {}\n",
                range,
                value.load(Ordering::Relaxed)
            ));
        }

        counter(
            &mut output,
            "http_request_duration_ms_total",
            "Total HTTP request duration in milliseconds",
            self.http_request_duration_ms_total.load(Ordering::Relaxed),
        );

        output.push_str("# HELP http_requests_active Requests currently in flight\n");
        output.push_str("# TYPE http_requests_active gauge\n");
        output.push_str(&format!(
            "http_requests_active {}\n",
            self.active_requests.load(Ordering::Relaxed)
        ));

        // Lifecycle
        counter(
            &mut output,
            "workitem_transitions_total",
            "Accepted work item status transitions",
            self.transitions_total.load(Ordering::Relaxed),
        );

        output.push_str("# HELP workitem_transitions_by_status Accepted transitions by target status\n");
        output.push_str("# TYPE workitem_transitions_by_status counter\n");
        for status in WorkItemStatus::ALL {
            output.push_str(&format!(
                "workitem_transitions_by_status{{status=\"{}\"}} {}\n",
                status.as_str(),
                self.transitions_to(status)
            ));
        }

        counter(
            &mut output,
            "workitem_transitions_unchanged_total",
            "Transitions to the status the item already had",
            self.transitions_unchanged.load(Ordering::Relaxed),
        );
        counter(
            &mut output,
            "workitem_transition_conflicts_total",
            "Transitions rejected because of a stale lock version",
            self.transition_conflicts.load(Ordering::Relaxed),
        );
        counter(
            &mut output,
            "profile_score_recomputations_total",
            "Writes that recomputed assignee scores",
            self.score_recomputations.load(Ordering::Relaxed),
        );

        output.push_str("# HELP uptime_seconds Server uptime in seconds\n");
        output.push_str("# TYPE uptime_seconds gauge\n");
        output.push_str(&format!("uptime_seconds {}\n", self.uptime_seconds()));

        output
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Value {
        let by_status: serde_json::Map<String, serde_json::Value> = WorkItemStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), self.transitions_to(*s).into()))
            .collect();

        serde_json::json!({
            "http": {
                "requests_total": self.http_requests_total.load(Ordering::Relaxed),
                "requests_2xx": self.http_requests_2xx.load(Ordering::Relaxed),
                "requests_4xx": self.http_requests_4xx.load(Ordering::Relaxed),
                "requests_5xx": self.http_requests_5xx.load(Ordering::Relaxed),
                "request_duration_ms_total": self.http_request_duration_ms_total.load(Ordering::Relaxed),
                "active_requests": self.active_requests.load(Ordering::Relaxed),
            },
            "lifecycle": {
                "transitions_total": self.transitions_total.load(Ordering::Relaxed),
                "transitions_by_status": by_status,
                "transitions_unchanged": self.transitions_unchanged.load(Ordering::Relaxed),
                "transition_conflicts": self.transition_conflicts.load(Ordering::Relaxed),
                "score_recomputations": self.score_recomputations.load(Ordering::Relaxed),
            },
            "uptime_seconds": self.uptime_seconds(),
        })
    }
}

fn counter(output: &mut String, name: &str, help: &str, value: u64) {
    output.push_str(&format!("# HELP {} {}\n", name, help));
    output.push_str(&format!("# TYPE {} counter\n", name));
    output.push_str(&format!("{} {}\n", name, value));
}

impl LifecycleObserver for Metrics {
    fn transition(&self, _from: WorkItemStatus, to: WorkItemStatus, changed: bool) {
        self.transitions_total.fetch_add(1, Ordering::Relaxed);
        self.transitions_to[status_index(to)].fetch_add(1, Ordering::Relaxed);
        if !changed {
            self.transitions_unchanged.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn transition_conflict(&self) {
        self.transition_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    fn rescored(&self) {
        self.score_recomputations.fetch_add(1, Ordering::Relaxed);
    }
}

/// Metrics middleware
pub async fn metrics_middleware(
    State(metrics): State<Arc<Metrics>>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().path().to_string();

    metrics.request_started();

    let response = next
        .run(request)
        .instrument(info_span!("http_request", %method, %uri))
        .await;

    let duration = start.elapsed();
    let status = response.status();

    debug!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    metrics.record_request(status, duration.as_millis() as u64);
    metrics.request_finished();

    response
}

/// Handler for /metrics endpoint (Prometheus format)
pub async fn prometheus_metrics(State(metrics): State<Arc<Metrics>>) -> String {
    metrics.export_prometheus()
}

/// Handler for /metrics.json endpoint
pub async fn json_metrics(State(metrics): State<Arc<Metrics>>) -> axum::Json<serde_json::Value> {
    axum::Json(metrics.export_json())
}
