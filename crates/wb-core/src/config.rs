//! Configuration types and loading
//!
//! Layering, lowest precedence first:
//! 1. defaults from [`AppConfig::default`]
//! 2. an optional file (`workboard.toml`, or the path in `WORKBOARD_CONFIG`)
//! 3. `WORKBOARD__SECTION__KEY` environment variables
//! 4. the conventional `DATABASE_URL`, `HOST`, `PORT` and `JWT_SECRET`

use serde::{Deserialize, Serialize};

use crate::error::WbError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub scoring: ScoringConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
    pub instance: InstanceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// `postgres://...` or `memory://`
    pub url: String,
    pub pool_size: u32,
    pub pool_timeout_seconds: u64,
    /// Apply the bundled migrations on startup
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with("memory://")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
    /// How long a health report is served from cache
    pub health_cache_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT secret for token signing
    pub jwt_secret: String,
    /// Token expiration in seconds
    pub token_expiration_seconds: u64,
    pub issuer: String,
}

/// Weights and deltas of the performance/workload model
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScoringConfig {
    /// Performance gained when an item is accepted on time
    pub on_time_bonus: f64,
    /// Performance lost when an item is accepted after its deadline
    pub late_penalty: f64,
    /// Performance lost when a reviewer sends an item back
    pub changes_requested_penalty: f64,
    pub rejection_penalty: f64,
    pub weights: PriorityWeights,
    /// Multiplier for open items past their deadline
    pub overdue_factor: f64,
    /// Weighted open items that amount to a full workload
    pub capacity: f64,
    pub sweep_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PriorityWeights {
    pub critical: f64,
    pub major: f64,
    pub medium: f64,
    pub minor: f64,
    pub low: f64,
}

impl ScoringConfig {
    /// Every numeric factor with its config key
    pub fn factors(&self) -> [(&'static str, f64); 11] {
        [
            ("on_time_bonus", self.on_time_bonus),
            ("late_penalty", self.late_penalty),
            ("changes_requested_penalty", self.changes_requested_penalty),
            ("rejection_penalty", self.rejection_penalty),
            ("overdue_factor", self.overdue_factor),
            ("capacity", self.capacity),
            ("weights.critical", self.weights.critical),
            ("weights.major", self.weights.major),
            ("weights.medium", self.weights.medium),
            ("weights.minor", self.weights.minor),
            ("weights.low", self.weights.low),
        ]
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            on_time_bonus: 5.0,
            late_penalty: 5.0,
            changes_requested_penalty: 2.0,
            rejection_penalty: 10.0,
            weights: PriorityWeights::default(),
            overdue_factor: 1.5,
            capacity: 10.0,
            sweep_interval_seconds: 300,
        }
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            critical: 2.0,
            major: 1.5,
            medium: 1.0,
            minor: 0.75,
            low: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DashboardConfig {
    /// Window for "due soon" counts
    pub due_soon_days: i64,
    /// Length of the employee's upcoming-deadline list
    pub upcoming_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            due_soon_days: 3,
            upcoming_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// EnvFilter directives; `RUST_LOG` wins when set
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstanceConfig {
    pub app_title: String,
    pub default_page_size: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost/workboard".to_string(),
                pool_size: 10,
                pool_timeout_seconds: 30,
                run_migrations: true,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout_seconds: 30,
                health_cache_seconds: 5,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
                token_expiration_seconds: 86400,
                issuer: "workboard".to_string(),
            },
            scoring: ScoringConfig::default(),
            dashboard: DashboardConfig::default(),
            logging: LoggingConfig::default(),
            instance: InstanceConfig {
                app_title: "WorkBoard".to_string(),
                default_page_size: 20,
            },
        }
    }
}

fn config_error(err: config::ConfigError) -> WbError {
    WbError::Config(err.to_string())
}

impl AppConfig {
    /// Load configuration from all layers
    pub fn load() -> Result<Self, WbError> {
        let file = std::env::var("WORKBOARD_CONFIG").ok();
        let mut config = Self::from_layers(file.as_deref(), Self::environment())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("WORKBOARD")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Defaults, then the optional file, then `environment`
    pub fn from_layers(
        file: Option<&str>,
        environment: config::Environment,
    ) -> Result<Self, WbError> {
        let defaults = config::Config::try_from(&AppConfig::default()).map_err(config_error)?;
        let file = file.unwrap_or("workboard");

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(file).required(false))
            .add_source(environment)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)
    }

    /// Apply the conventional single-variable overrides
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<(), WbError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(WbError::Config("auth.jwt_secret must not be empty".into()));
        }
        for (name, value) in self.scoring.factors() {
            if !value.is_finite() || value < 0.0 {
                return Err(WbError::Config(format!(
                    "scoring.{} must be a finite, non-negative number",
                    name
                )));
            }
        }
        if self.scoring.capacity <= 0.0 {
            return Err(WbError::Config("scoring.capacity must be positive".into()));
        }
        if self.scoring.sweep_interval_seconds == 0 {
            return Err(WbError::Config(
                "scoring.sweep_interval_seconds must be positive".into(),
            ));
        }
        if self.dashboard.due_soon_days < 0 {
            return Err(WbError::Config(
                "dashboard.due_soon_days must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::SocketAddr;
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.server.port)
    }
}
