//! # Error Types
//!
//! Error taxonomy shared by the ledger, the gateway and every client.
//!
//! | Class        | Detected by | Retry?                        |
//! |--------------|-------------|-------------------------------|
//! | `Validation` | client      | no, fix the input             |
//! | `Conflict`   | server      | no, surface verbatim          |
//! | `Ownership`  | server      | yes, with a different code    |
//! | `Transient`  | transport   | yes, same idempotent request  |
//! | `Resource`   | client      | degrade (e.g. manual entry)   |

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Broad class of a failure, used to decide retry and presentation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Validation,
    Conflict,
    Ownership,
    Transient,
    Resource,
}

/// Machine-readable reason carried on an error envelope next to `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionCode {
    // Allocation
    OutOfStock,
    QuantityOutOfRange,
    OutsideWindow,
    DeliveryNotSupported,
    // Lookup
    FoodNotFound,
    ClaimNotFound,
    // Listings
    InvalidListing,
    DuplicateListing,
    // Status machine
    AlreadyCompleted,
    AlreadyCancelled,
    NotScanned,
    ScanFlagReadOnly,
    InvalidTransition,
    // Courier leg
    NotADeliveryClaim,
    CourierAlreadyAssigned,
    CourierNotAssigned,
    CourierNotDelivering,
    // Authorization
    NotAuthorized,
    // Feedback
    NotCompleted,
    AlreadyReviewed,
    AlreadyReported,
    InvalidRating,
    MissingDescription,
    // Envelope
    InvalidRequest,
    UnknownAction,
    Internal,
}

impl RejectionCode {
    /// Classifies the code.
    pub fn class(self) -> ErrorClass {
        use RejectionCode::*;
        match self {
            QuantityOutOfRange | OutsideWindow | DeliveryNotSupported | InvalidListing
            | InvalidRating | MissingDescription | InvalidRequest | UnknownAction
            | NotADeliveryClaim | InvalidTransition => ErrorClass::Validation,
            OutOfStock | FoodNotFound | ClaimNotFound | DuplicateListing | AlreadyCompleted
            | AlreadyCancelled | NotScanned | ScanFlagReadOnly | CourierAlreadyAssigned
            | CourierNotAssigned | CourierNotDelivering | NotCompleted | AlreadyReviewed
            | AlreadyReported => ErrorClass::Conflict,
            NotAuthorized => ErrorClass::Ownership,
            Internal => ErrorClass::Transient,
        }
    }

    /// Wire name, e.g. `OUT_OF_STOCK`.
    pub fn as_str(self) -> &'static str {
        use RejectionCode::*;
        match self {
            OutOfStock => "OUT_OF_STOCK",
            QuantityOutOfRange => "QUANTITY_OUT_OF_RANGE",
            OutsideWindow => "OUTSIDE_WINDOW",
            DeliveryNotSupported => "DELIVERY_NOT_SUPPORTED",
            FoodNotFound => "FOOD_NOT_FOUND",
            ClaimNotFound => "CLAIM_NOT_FOUND",
            InvalidListing => "INVALID_LISTING",
            DuplicateListing => "DUPLICATE_LISTING",
            AlreadyCompleted => "ALREADY_COMPLETED",
            AlreadyCancelled => "ALREADY_CANCELLED",
            NotScanned => "NOT_SCANNED",
            ScanFlagReadOnly => "SCAN_FLAG_READ_ONLY",
            InvalidTransition => "INVALID_TRANSITION",
            NotADeliveryClaim => "NOT_A_DELIVERY_CLAIM",
            CourierAlreadyAssigned => "COURIER_ALREADY_ASSIGNED",
            CourierNotAssigned => "COURIER_NOT_ASSIGNED",
            CourierNotDelivering => "COURIER_NOT_DELIVERING",
            NotAuthorized => "NOT_AUTHORIZED",
            NotCompleted => "NOT_COMPLETED",
            AlreadyReviewed => "ALREADY_REVIEWED",
            AlreadyReported => "ALREADY_REPORTED",
            InvalidRating => "INVALID_RATING",
            MissingDescription => "MISSING_DESCRIPTION",
            InvalidRequest => "INVALID_REQUEST",
            UnknownAction => "UNKNOWN_ACTION",
            Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a client talking to the Persistence Gateway.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Connection refused, reset, DNS failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("Gateway timed out")]
    Timeout,

    /// JSON body that does not fit the envelope or the command's payload.
    #[error("Malformed gateway response: {0}")]
    Malformed(String),

    /// Body starting with `<`: an HTML page from a proxy or a wrong deployment.
    #[error("Gateway misconfigured: received markup instead of JSON ({preview})")]
    Misconfigured { preview: String },

    /// The gateway answered with `status: "error"`.
    #[error("Rejected: {message}")]
    Rejected {
        code: Option<RejectionCode>,
        message: String,
    },
}

impl GatewayError {
    /// Classifies the failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Transport(_) | Self::Timeout | Self::Malformed(_) => ErrorClass::Transient,
            Self::Misconfigured { .. } => ErrorClass::Resource,
            Self::Rejected { code, .. } => code.map_or(ErrorClass::Conflict, RejectionCode::class),
        }
    }

    /// True when re-sending the same request is safe and may succeed.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Rejection code, if the server supplied one.
    pub fn code(&self) -> Option<RejectionCode> {
        match self {
            Self::Rejected { code, .. } => *code,
            _ => None,
        }
    }

    pub fn rejected(code: RejectionCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: Some(code),
            message: message.into(),
        }
    }
}

/// Structural problems with a food listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("Listing name must not be empty")]
    MissingName,

    #[error("Minimum quantity must be at least 1")]
    ZeroMinimum,

    #[error("Minimum quantity {min} exceeds maximum {max}")]
    InvertedBounds { min: u32, max: u32 },

    #[error("Current quantity {current} exceeds initial quantity {initial}")]
    StockAboveInitial { current: u32, initial: u32 },

    #[error("Distribution window ends before it starts")]
    InvertedWindow,
}
