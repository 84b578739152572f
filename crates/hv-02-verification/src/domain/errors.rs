//! Verification error types.

use crate::ports::CameraError;
use shared_types::{ErrorClass, GatewayError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// Camera could not be opened or its stream ended. The session is in
    /// manual mode when this is returned.
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(#[from] CameraError),

    /// Blank code typed in manual mode.
    #[error("Verification code is empty")]
    EmptyCode,

    /// Camera-only operation while in manual mode.
    #[error("Session is in manual entry mode")]
    ManualMode,

    /// Session was closed.
    #[error("Verification session is closed")]
    Closed,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl VerificationError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::CameraUnavailable(_) | Self::Closed => ErrorClass::Resource,
            Self::EmptyCode | Self::ManualMode => ErrorClass::Validation,
            Self::Gateway(e) => e.class(),
        }
    }

    /// Safe to submit the same code again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_retryable())
    }
}
