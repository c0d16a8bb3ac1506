//! Health checks
//!
//! Liveness is unconditional; readiness pings the database and checks the
//! document storage root. Results are cached briefly so frequent polling
//! does not hammer the pool.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

/// Individual component health
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
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
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Health checker configuration
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Timeout for individual checks
    pub check_timeout: Duration,
    /// Cache duration for health results
    pub cache_duration: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            cache_duration: Duration::from_secs(10),
        }
    }
}

struct CachedHealth {
    report: HealthReport,
    cached_at: Instant,
}

/// Health checker service
pub struct HealthChecker {
    config: HealthConfig,
    start_time: Instant,
    cache: RwLock<Option<CachedHealth>>,
    pool: Option<PgPool>,
    document_root: Option<PathBuf>,
}

impl HealthChecker {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            cache: RwLock::new(None),
            pool: None,
            document_root: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_document_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.document_root = Some(root.into());
        self
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

        {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedHealth {
                report: report.clone(),
                cached_at: Instant::now(),
            });
        }

        report
    }

    async fn perform_checks(&self) -> HealthReport {
        let mut components = Vec::new();
        let mut overall = HealthStatus::Healthy;

        if self.pool.is_some() {
            let db_health = self.check_database().await;
            if db_health.status == HealthStatus::Unhealthy {
                overall = HealthStatus::Unhealthy;
            }
            components.push(db_health);
        }

        if self.document_root.is_some() {
            let storage_health = self.check_document_storage().await;
            // Missing storage degrades but does not block readiness; documents
            // are rendered lazily and the directory is created on first write.
            if storage_health.status != HealthStatus::Healthy
                && overall == HealthStatus::Healthy
            {
                overall = HealthStatus::Degraded;
            }
            components.push(storage_health);
        }

        HealthReport {
            status: overall,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now(),
        }
    }

    async fn check_database(&self) -> ComponentHealth {
        let start = Instant::now();

        let (status, message) = match &self.pool {
            Some(pool) => {
                let ping = sqlx::query("SELECT 1").execute(pool);
                match tokio::time::timeout(self.config.check_timeout, ping).await {
                    Ok(Ok(_)) => (HealthStatus::Healthy, Some("connected".to_string())),
                    Ok(Err(e)) => (HealthStatus::Unhealthy, Some(e.to_string())),
                    Err(_) => (
                        HealthStatus::Unhealthy,
                        Some("ping timed out".to_string()),
                    ),
                }
            }
            None => (HealthStatus::Unhealthy, Some("no pool".to_string())),
        };

        ComponentHealth {
            name: "database".to_string(),
            status,
            message,
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn check_document_storage(&self) -> ComponentHealth {
        let start = Instant::now();

        let (status, message) = match &self.document_root {
            Some(root) => match tokio::fs::metadata(root).await {
                Ok(meta) if meta.is_dir() => {
                    (HealthStatus::Healthy, Some("writable".to_string()))
                }
                Ok(_) => (
                    HealthStatus::Degraded,
                    Some("document root is not a directory".to_string()),
                ),
                Err(_) => (
                    HealthStatus::Degraded,
                    Some("document root missing".to_string()),
                ),
            },
            None => (HealthStatus::Degraded, Some("not configured".to_string())),
        };

        ComponentHealth {
            name: "document_storage".to_string(),
            status,
            message,
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// State for the health routes
#[derive(Clone)]
pub struct HealthState {
    pub checker: Arc<HealthChecker>,
}

/// Simple liveness check (Kubernetes)
pub async fn liveness() -> &'static str {
    "OK"
}

/// Readiness check (Kubernetes)
pub async fn readiness(State(state): State<HealthState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.checker.check().await;
    let status = report.http_status();
    (status, Json(report))
}

/// Full health report
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.checker.check().await;
    let status = report.http_status();
    (status, Json(report))
}
