//! # Harvest Telemetry
//!
//! Logging and metrics for Harvest services.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events through a `tracing-subscriber` registry,
//!   pretty in development and JSON in containers
//! - **Metrics**: Prometheus counters in a crate-local registry, rendered by
//!   the gateway's `GET /metrics`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use harvest_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HV_SERVICE_NAME` | `harvest` | Service name in logs |
//! | `HV_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `HV_JSON_LOGS` | `false` | JSON output (defaults on in containers) |
//! | `HV_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `HV_METRICS_ENABLED` | `true` | Register Prometheus counters |
//! | `HV_ENVIRONMENT` | `dev` | Deployment environment |

mod config;
mod logging;
pub mod metrics;
mod subscriber;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, ActionTimer, CLAIMS_COMPLETED, CLAIMS_CREATED,
    CLAIMS_REJECTED, FEEDBACK_SUBMITTED, GATEWAY_ACTIONS, GATEWAY_ACTION_DURATION,
    VERIFICATIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    if config.metrics_enabled {
        register_metrics()?;
    }

    subscriber::init_subscriber(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Logs a final line when dropped.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Convenience macro for creating a span with component context.
///
/// # Example
///
/// ```rust,ignore
/// let _span = harvest_telemetry::component_span!("process_claim", component = "ledger", food_id = %id);
/// ```
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
