//! Structured logging helpers.
//!
//! Every event carries a `component` field so JSON logs can be split by
//! crate without parsing targets:
//! - `component`: ledger, gateway, verification, distribution, feedback
//! - `claim_id` / `food_id` / `action` where relevant

/// Log an event with a component field.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a claim-related event with standard fields.
#[macro_export]
macro_rules! log_claim_event {
    ($level:ident, $component:expr, $msg:expr, $claim_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            claim_id = %$claim_id,
            $($($field)*,)?
            $msg
        )
    };
}
