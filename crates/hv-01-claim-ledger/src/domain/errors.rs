//! Claim ledger error types.
//!
//! Every variant maps onto a wire [`RejectionCode`] so the gateway can put a
//! machine-readable reason next to the human message.

use shared_types::{
    ClaimId, CourierId, DeliveryCapability, DeliveryMethod, DistributionWindow, FoodId,
    ListingError, RejectionCode, Timestamp,
};
use thiserror::Error;

/// Claim ledger error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Listing does not exist.
    #[error("Food listing {0} not found")]
    FoodNotFound(FoodId),

    /// Claim does not exist.
    #[error("Claim {0} not found")]
    ClaimNotFound(ClaimId),

    /// Listing has no stock left.
    #[error("Food listing {0} is out of stock")]
    OutOfStock(FoodId),

    /// Requested quantity outside the allocator's bounds.
    #[error("Quantity {requested} is outside the allowed range {min}..={max}")]
    QuantityOutOfRange { requested: u32, min: u32, max: u32 },

    /// Claim attempted outside the listing's distribution window.
    #[error("Listing is not being distributed at {now} (window {}..={})", .window.starts_at, .window.ends_at)]
    OutsideWindow {
        now: Timestamp,
        window: DistributionWindow,
    },

    /// Listing does not offer the requested delivery method.
    #[error("Listing offers {capability:?} only, {method:?} was requested")]
    DeliveryNotSupported {
        method: DeliveryMethod,
        capability: DeliveryCapability,
    },

    /// Listing failed structural validation.
    #[error("Invalid listing: {0}")]
    InvalidListing(#[from] ListingError),

    /// Listing id already in use.
    #[error("Food listing {0} already exists")]
    DuplicateListing(FoodId),

    /// Claim is completed (terminal).
    #[error("Claim {0} is already completed")]
    AlreadyCompleted(ClaimId),

    /// Claim is cancelled (terminal).
    #[error("Claim {0} is already cancelled")]
    AlreadyCancelled(ClaimId),

    /// Completion requested before the code was verified.
    #[error("Claim {0} has not been scanned yet")]
    NotScanned(ClaimId),

    /// Client tried to write `isScanned` directly.
    #[error("isScanned can only be set by code verification")]
    ScanFlagReadOnly,

    /// Status update that names no valid transition.
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    /// Courier operation on a pickup claim.
    #[error("Claim {0} is not a delivery claim")]
    NotADeliveryClaim(ClaimId),

    /// Courier leg already taken.
    #[error("Claim {claim_id} is already assigned to courier {courier_id}")]
    CourierAlreadyAssigned {
        claim_id: ClaimId,
        courier_id: CourierId,
    },

    /// Courier operation before any courier was assigned.
    #[error("Claim {0} has no courier assigned")]
    CourierNotAssigned(ClaimId),

    /// Delivery completion while the courier is still picking up.
    #[error("Claim {0} is not out for delivery yet")]
    CourierNotDelivering(ClaimId),

    /// Actor is not allowed to perform the operation on this claim.
    #[error("Not authorized to {0} this claim")]
    NotAuthorized(&'static str),

    /// Review on a claim that is not completed.
    #[error("Claim {0} is not completed")]
    NotCompleted(ClaimId),

    /// Review already attached.
    #[error("Claim {0} has already been reviewed")]
    AlreadyReviewed(ClaimId),

    /// Report already attached.
    #[error("Claim {0} has already been reported")]
    AlreadyReported(ClaimId),

    /// Rating outside 1..=5.
    #[error("Rating {0} is outside 1..=5")]
    InvalidRating(u8),

    /// `other` report reason without free text.
    #[error("A description is required for reason 'other'")]
    MissingDescription,

    /// Request lacks a field the operation needs.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Code generator kept colliding with existing codes.
    #[error("Could not generate a unique verification code after {0} attempts")]
    CodeSpaceExhausted(u32),
}

impl LedgerError {
    /// Wire rejection code for this error.
    pub fn code(&self) -> RejectionCode {
        match self {
            Self::FoodNotFound(_) => RejectionCode::FoodNotFound,
            Self::ClaimNotFound(_) => RejectionCode::ClaimNotFound,
            Self::OutOfStock(_) => RejectionCode::OutOfStock,
            Self::QuantityOutOfRange { .. } => RejectionCode::QuantityOutOfRange,
            Self::OutsideWindow { .. } => RejectionCode::OutsideWindow,
            Self::DeliveryNotSupported { .. } => RejectionCode::DeliveryNotSupported,
            Self::InvalidListing(_) => RejectionCode::InvalidListing,
            Self::DuplicateListing(_) => RejectionCode::DuplicateListing,
            Self::AlreadyCompleted(_) => RejectionCode::AlreadyCompleted,
            Self::AlreadyCancelled(_) => RejectionCode::AlreadyCancelled,
            Self::NotScanned(_) => RejectionCode::NotScanned,
            Self::ScanFlagReadOnly => RejectionCode::ScanFlagReadOnly,
            Self::InvalidTransition(_) => RejectionCode::InvalidTransition,
            Self::NotADeliveryClaim(_) => RejectionCode::NotADeliveryClaim,
            Self::CourierAlreadyAssigned { .. } => RejectionCode::CourierAlreadyAssigned,
            Self::CourierNotAssigned(_) => RejectionCode::CourierNotAssigned,
            Self::CourierNotDelivering(_) => RejectionCode::CourierNotDelivering,
            Self::NotAuthorized(_) => RejectionCode::NotAuthorized,
            Self::NotCompleted(_) => RejectionCode::NotCompleted,
            Self::AlreadyReviewed(_) => RejectionCode::AlreadyReviewed,
            Self::AlreadyReported(_) => RejectionCode::AlreadyReported,
            Self::InvalidRating(_) => RejectionCode::InvalidRating,
            Self::MissingDescription => RejectionCode::MissingDescription,
            Self::MissingField(_) => RejectionCode::InvalidRequest,
            Self::CodeSpaceExhausted(_) => RejectionCode::Internal,
        }
    }
}
