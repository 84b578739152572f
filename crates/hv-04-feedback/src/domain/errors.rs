//! Feedback error types.

use shared_types::{ClaimId, ClaimStatus, ErrorClass, GatewayError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Rating {0} is outside 1..=5")]
    InvalidRating(u8),

    /// Reason `other` without free text.
    #[error("A description is required for reason 'other'")]
    MissingDescription,

    /// Claim is not in the local cache; refresh first.
    #[error("Claim {0} is not loaded")]
    UnknownClaim(ClaimId),

    /// Reviews need a completed claim.
    #[error("Claim {0} is {1}, reviews need a completed claim")]
    NotCompleted(ClaimId, ClaimStatus),

    #[error("Claim {0} has already been reviewed")]
    AlreadyReviewed(ClaimId),

    #[error("Claim {0} has already been reported")]
    AlreadyReported(ClaimId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl FeedbackError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidRating(_) | Self::MissingDescription => ErrorClass::Validation,
            Self::UnknownClaim(_) => ErrorClass::Resource,
            Self::NotCompleted(..) | Self::AlreadyReviewed(_) | Self::AlreadyReported(_) => {
                ErrorClass::Conflict
            }
            Self::Gateway(e) => e.class(),
        }
    }
}
