//! # Gateway Envelope
//!
//! The single request/response wrapper for ALL Persistence Gateway traffic.
//!
//! ```text
//! request  = { "action": "PROCESS_CLAIM", "data": { ... } }
//! response = { "status": "success", "data": { ... } }
//!          | { "status": "error", "message": "...", "code": "OUT_OF_STOCK" }
//! ```
//!
//! The transport always answers HTTP 200; `status` inside the envelope is the
//! only success signal.

use crate::errors::RejectionCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

impl GatewayRequest {
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Self {
            action: action.into(),
            data,
        }
    }
}

/// Envelope-level outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Inbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<RejectionCode>,
}

impl GatewayResponse {
    pub fn success(data: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            message: None,
            code: None,
        }
    }

    pub fn error(code: RejectionCode, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            message: Some(message.into()),
            code: Some(code),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
