//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `info,hv_01_claim_ledger=debug`
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// JSON formatted logs instead of the pretty development format
    pub json_logs: bool,

    /// Whether Prometheus counters are registered
    pub metrics_enabled: bool,

    /// Deployment environment (dev, staging, production)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "harvest".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_enabled: true,
            environment: "dev".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HV_SERVICE_NAME`: Service name (default: harvest)
    /// - `HV_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `HV_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `HV_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `HV_METRICS_ENABLED`: Register Prometheus counters (default: true)
    /// - `HV_ENVIRONMENT`: Environment name (default: dev)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("HV_SERVICE_NAME").unwrap_or_else(|_| "harvest".to_string()),

            log_level: env::var("HV_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("HV_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            json_logs: env::var("HV_JSON_LOGS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(is_container),

            metrics_enabled: env::var("HV_METRICS_ENABLED")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            environment: env::var("HV_ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()),
        }
    }

    /// Configuration for a named component, e.g. `gateway`.
    pub fn for_component(component: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("{}-{}", config.service_name, component);
        config
    }
}

/// `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`, anything else falls back.
fn parse_flag(value: &str, fallback: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => fallback,
    }
}
