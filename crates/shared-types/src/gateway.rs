//! # Persistence Gateway Port
//!
//! Every client talks to the backend through this trait. Adapters (HTTP,
//! in-process) live in the gateway crate; tests provide their own.

use crate::commands::GatewayCommand;
use crate::envelope::{GatewayRequest, GatewayResponse, ResponseStatus};
use crate::errors::GatewayError;
use async_trait::async_trait;

/// Number of body characters kept in a `Misconfigured` error.
const PREVIEW_CHARS: usize = 80;

/// Single request/response action dispatcher.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Sends one envelope and returns the decoded response envelope.
    ///
    /// An `Err` means no trustworthy envelope came back. A response with
    /// `status: "error"` is still `Ok`.
    async fn dispatch(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for std::sync::Arc<G> {
    async fn dispatch(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        (**self).dispatch(request).await
    }
}

/// Sends a typed command and decodes its typed response.
pub async fn send<C, G>(gateway: &G, request: &C::Request) -> Result<C::Response, GatewayError>
where
    C: GatewayCommand,
    G: PersistenceGateway + ?Sized,
{
    let data = serde_json::to_value(request)
        .map_err(|e| GatewayError::Malformed(format!("{}: cannot encode request: {e}", C::ACTION)))?;

    let response = gateway.dispatch(GatewayRequest::new(C::ACTION, data)).await?;

    match response.status {
        ResponseStatus::Error => {
            tracing::debug!(action = C::ACTION, code = ?response.code, "gateway rejected request");
            Err(GatewayError::Rejected {
                code: response.code,
                message: response
                    .message
                    .unwrap_or_else(|| format!("{} failed", C::ACTION)),
            })
        }
        ResponseStatus::Success => {
            let data = response.data.ok_or_else(|| {
                GatewayError::Malformed(format!("{}: success without data", C::ACTION))
            })?;
            serde_json::from_value(data)
                .map_err(|e| GatewayError::Malformed(format!("{}: {e}", C::ACTION)))
        }
    }
}

/// Decodes a raw response body into an envelope.
///
/// A body starting with `<` is a deployment problem (HTML error page, wrong
/// URL), reported as `Misconfigured` instead of a parse failure.
pub fn parse_envelope(body: &str) -> Result<GatewayResponse, GatewayError> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        return Err(GatewayError::Misconfigured {
            preview: trimmed.chars().take(PREVIEW_CHARS).collect(),
        });
    }
    serde_json::from_str(trimmed).map_err(|e| GatewayError::Malformed(e.to_string()))
}
