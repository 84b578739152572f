//! # Core Domain Entities
//!
//! Wire-level entities exchanged through the Persistence Gateway.
//!
//! ## Clusters
//!
//! - **Identity**: `FoodId`, `ClaimId`, `ProviderId`, `ReceiverId`, `CourierId`
//! - **Inventory**: `FoodItem`, `DistributionWindow`, `DeliveryCapability`
//! - **Claims**: `ClaimRecord`, `ClaimStatus`, `CourierStatus`, `DeliveryMethod`
//! - **Feedback**: `ReportReason`, `ReportStatus`
//!
//! `ClaimRecord` is the flat wire shape. The ledger keeps a richer internal
//! representation where impossible combinations (a courier stage on a
//! completed claim, say) cannot be expressed.

use crate::errors::ListingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a food listing.
    FoodId
);
string_id!(
    /// Identifier of a claim.
    ClaimId
);
string_id!(
    /// Identifier of a provider (donor, listing owner).
    ProviderId
);
string_id!(
    /// Identifier of a receiver (beneficiary).
    ReceiverId
);
string_id!(
    /// Identifier of a volunteer courier.
    CourierId
);

// =============================================================================
// INVENTORY
// =============================================================================

/// How a claimed quantity travels from provider to receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// Receiver collects at the provider's stall.
    Pickup,
    /// A courier moves the food to the receiver.
    Delivery,
}

/// Which delivery methods a listing accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryCapability {
    Pickup,
    Delivery,
    Both,
}

impl DeliveryCapability {
    /// Returns true if a claim with `method` may be placed on this listing.
    pub fn supports(self, method: DeliveryMethod) -> bool {
        matches!(
            (self, method),
            (Self::Both, _)
                | (Self::Pickup, DeliveryMethod::Pickup)
                | (Self::Delivery, DeliveryMethod::Delivery)
        )
    }
}

/// Time range during which a listing may be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionWindow {
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl DistributionWindow {
    /// A window that never closes. Used for listings without a schedule.
    pub const ALWAYS: Self = Self {
        starts_at: 0,
        ends_at: Timestamp::MAX,
    };

    pub fn contains(&self, now: Timestamp) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }
}

impl Default for DistributionWindow {
    fn default() -> Self {
        Self::ALWAYS
    }
}

/// A surplus-food listing.
///
/// Invariant: `0 <= current_quantity <= initial_quantity`. Once claims exist
/// `current_quantity` only ever decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: FoodId,
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub name: String,
    pub initial_quantity: u32,
    pub current_quantity: u32,
    /// Normal minimum per claim (policy bound).
    pub min_quantity: u32,
    /// Maximum per claim (policy bound).
    pub max_quantity: u32,
    #[serde(default)]
    pub window: DistributionWindow,
    pub delivery_capability: DeliveryCapability,
}

impl FoodItem {
    /// Checks the listing's structural invariants.
    pub fn validate(&self) -> Result<(), ListingError> {
        if self.name.trim().is_empty() {
            return Err(ListingError::MissingName);
        }
        if self.min_quantity == 0 {
            return Err(ListingError::ZeroMinimum);
        }
        if self.min_quantity > self.max_quantity {
            return Err(ListingError::InvertedBounds {
                min: self.min_quantity,
                max: self.max_quantity,
            });
        }
        if self.current_quantity > self.initial_quantity {
            return Err(ListingError::StockAboveInitial {
                current: self.current_quantity,
                initial: self.initial_quantity,
            });
        }
        if self.window.starts_at > self.window.ends_at {
            return Err(ListingError::InvertedWindow);
        }
        Ok(())
    }

    /// Returns true while any stock remains.
    pub fn is_available(&self) -> bool {
        self.current_quantity > 0
    }

    /// Quantity already handed out through claims.
    pub fn claimed_total(&self) -> u32 {
        self.initial_quantity - self.current_quantity
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

/// Top-level claim status on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Active,
    Completed,
    Cancelled,
}

impl ClaimStatus {
    /// `completed` and `cancelled` are absorbing.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Courier sub-status on an active delivery claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourierStatus {
    PickingUp,
    Delivering,
}

/// Who is asking for a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Actor {
    Provider(ProviderId),
    Receiver(ReceiverId),
    Courier(CourierId),
    Admin,
}

/// Fixed set of report reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spoiled,
    NotAsDescribed,
    QuantityMismatch,
    NoShow,
    SafetyConcern,
    /// Free text goes in the report description.
    Other,
}

impl ReportReason {
    pub const ALL: [ReportReason; 6] = [
        Self::Spoiled,
        Self::NotAsDescribed,
        Self::QuantityMismatch,
        Self::NoShow,
        Self::SafetyConcern,
        Self::Other,
    ];

    /// `Other` is meaningless without a description.
    pub fn requires_description(self) -> bool {
        matches!(self, Self::Other)
    }
}

/// Moderation state of a filed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
}

/// Flat wire shape of a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub id: ClaimId,
    pub food_id: FoodId,
    pub food_name: String,
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub receiver_id: ReceiverId,
    pub receiver_name: String,
    pub claimed_quantity: u32,
    pub delivery_method: DeliveryMethod,
    pub status: ClaimStatus,
    pub is_scanned: bool,
    /// Present only for the claim's receiver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<CourierId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_status: Option<CourierStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_media: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_reason: Option<ReportReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_description: Option<String>,
    /// Encoded with [`crate::encode_evidence`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_status: Option<ReportStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<Timestamp>,
}

impl ClaimRecord {
    /// Drops the verification code. Used for every reader except the receiver.
    pub fn redacted(mut self) -> Self {
        self.unique_code = None;
        self
    }

    /// Report evidence URLs, whichever encoding they were stored in.
    pub fn evidence_urls(&self) -> Vec<String> {
        self.report_evidence
            .as_deref()
            .map(crate::decode_evidence)
            .unwrap_or_default()
    }

    /// True once a courier has been attached to this delivery claim.
    pub fn has_courier(&self) -> bool {
        self.courier_id.is_some()
    }
}
