//! Prometheus metrics for Harvest components.
//!
//! All metrics follow the naming convention: `hv_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // GATEWAY METRICS
    // =========================================================================

    /// Gateway actions by name and envelope status
    pub static ref GATEWAY_ACTIONS: CounterVec = CounterVec::new(
        Opts::new("hv_gateway_actions_total", "Gateway actions by action and envelope status"),
        &["action", "status"]  // status: success/error
    ).expect("metric creation failed");

    /// Time spent inside the ledger per action
    pub static ref GATEWAY_ACTION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "hv_gateway_action_duration_seconds",
            "Time spent handling a gateway action"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("valid buckets")),
        &["action"]
    ).expect("metric creation failed");

    // =========================================================================
    // CLAIM METRICS
    // =========================================================================

    /// Claims created (stock decremented)
    pub static ref CLAIMS_CREATED: Counter = Counter::new(
        "hv_claims_created_total",
        "Total claims created"
    ).expect("metric creation failed");

    /// Rejected claim requests by rejection code
    pub static ref CLAIMS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("hv_claims_rejected_total", "Rejected claim requests by code"),
        &["code"]
    ).expect("metric creation failed");

    /// Claims moved to completed
    pub static ref CLAIMS_COMPLETED: Counter = Counter::new(
        "hv_claims_completed_total",
        "Total claims completed"
    ).expect("metric creation failed");

    // =========================================================================
    // VERIFICATION METRICS
    // =========================================================================

    /// Verification attempts by outcome
    pub static ref VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("hv_verifications_total", "Verification code submissions by outcome"),
        &["outcome"]  // success/already_scanned/wrong_owner/not_found
    ).expect("metric creation failed");

    // =========================================================================
    // FEEDBACK METRICS
    // =========================================================================

    /// Reviews and reports attached to claims
    pub static ref FEEDBACK_SUBMITTED: CounterVec = CounterVec::new(
        Opts::new("hv_feedback_submitted_total", "Feedback attached to claims"),
        &["kind"]  // review/report
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Gateway
        Box::new(GATEWAY_ACTIONS.clone()),
        Box::new(GATEWAY_ACTION_DURATION.clone()),
        // Claims
        Box::new(CLAIMS_CREATED.clone()),
        Box::new(CLAIMS_REJECTED.clone()),
        Box::new(CLAIMS_COMPLETED.clone()),
        // Verification
        Box::new(VERIFICATIONS.clone()),
        // Feedback
        Box::new(FEEDBACK_SUBMITTED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard observing the elapsed time for one action on drop.
pub struct ActionTimer {
    action: String,
    start: std::time::Instant,
}

impl ActionTimer {
    /// Start a new timer for `action`.
    pub fn start(action: &str) -> Self {
        Self {
            action: action.to_string(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for ActionTimer {
    fn drop(&mut self) {
        GATEWAY_ACTION_DURATION
            .with_label_values(&[&self.action])
            .observe(self.start.elapsed().as_secs_f64());
    }
}
