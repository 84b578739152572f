//! Distribution error types.

use shared_types::{ClaimId, ClaimStatus, CourierId, ErrorClass, GatewayError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistributionError {
    /// Claim is not in the local cache; refresh first.
    #[error("Claim {0} is not loaded")]
    UnknownClaim(ClaimId),

    #[error("Claim {0} is a pickup claim")]
    NotADelivery(ClaimId),

    #[error("Claim {0} is {1}")]
    NotActive(ClaimId, ClaimStatus),

    #[error("Claim {claim_id} is already assigned to {courier_id}")]
    AlreadyAssigned {
        claim_id: ClaimId,
        courier_id: CourierId,
    },

    #[error("Claim {0} has no courier yet")]
    NoCourier(ClaimId),

    /// Provider has not verified the handover code.
    #[error("Claim {0} has not been scanned")]
    NotScanned(ClaimId),

    #[error("Claim {0} is not out for delivery")]
    NotDelivering(ClaimId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl DistributionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownClaim(_) => ErrorClass::Resource,
            Self::NotADelivery(_) => ErrorClass::Validation,
            Self::NotActive(..)
            | Self::AlreadyAssigned { .. }
            | Self::NoCourier(_)
            | Self::NotScanned(_)
            | Self::NotDelivering(_) => ErrorClass::Conflict,
            Self::Gateway(e) => e.class(),
        }
    }
}
