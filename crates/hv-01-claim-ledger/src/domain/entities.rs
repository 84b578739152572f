//! Ledger-side claim representation.
//!
//! `ClaimRecord` in shared-types is the flat wire shape. Inside the ledger a
//! claim's status, scan latch and courier leg live in one [`ClaimState`] enum,
//! so combinations such as "completed but still picking up" cannot exist.

use serde::{Deserialize, Serialize};
use shared_types::{
    encode_evidence, Actor, ClaimId, ClaimRecord, ClaimStatus, CourierId, CourierStatus,
    DeliveryMethod, FoodId, ProviderId, ReceiverId, ReportReason, ReportStatus, Timestamp,
};

/// Default length of generated verification codes.
pub const DEFAULT_CODE_LENGTH: usize = 10;

/// Attempts at drawing a code that is not already in use.
pub const DEFAULT_MAX_CODE_ATTEMPTS: u32 = 16;

/// Ledger configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub code_length: usize,
    pub max_code_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_code_attempts: DEFAULT_MAX_CODE_ATTEMPTS,
        }
    }
}

/// Courier identity on a delivery claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierAssignment {
    pub id: CourierId,
    pub name: String,
}

/// Courier leg of an active delivery claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierLeg {
    pub courier: CourierAssignment,
    pub stage: CourierStatus,
}

/// Claim status with its orthogonal sub-states.
///
/// ```text
///            ┌──────────── complete (scanned) ──→ Completed
/// Active ────┤
///  scanned: false → true (verification only)
///  courier: None → PickingUp → Delivering
///            └──────────── cancel ────────────→ Cancelled
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClaimState {
    Active {
        scanned: bool,
        courier: Option<CourierLeg>,
    },
    Completed {
        at: Timestamp,
        courier: Option<CourierAssignment>,
    },
    Cancelled {
        at: Timestamp,
        reason: Option<String>,
        scanned: bool,
        courier: Option<CourierAssignment>,
    },
}

impl ClaimState {
    pub fn status(&self) -> ClaimStatus {
        match self {
            Self::Active { .. } => ClaimStatus::Active,
            Self::Completed { .. } => ClaimStatus::Completed,
            Self::Cancelled { .. } => ClaimStatus::Cancelled,
        }
    }

    /// Completion always implies a verified handover.
    pub fn is_scanned(&self) -> bool {
        match self {
            Self::Active { scanned, .. } | Self::Cancelled { scanned, .. } => *scanned,
            Self::Completed { .. } => true,
        }
    }

    pub fn courier(&self) -> Option<&CourierAssignment> {
        match self {
            Self::Active { courier, .. } => courier.as_ref().map(|leg| &leg.courier),
            Self::Completed { courier, .. } | Self::Cancelled { courier, .. } => courier.as_ref(),
        }
    }

    /// Courier sub-status, only meaningful while active.
    pub fn courier_stage(&self) -> Option<CourierStatus> {
        match self {
            Self::Active {
                courier: Some(leg), ..
            } => Some(leg.stage),
            _ => None,
        }
    }
}

/// Review attached to a completed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    pub text: String,
    pub media: Vec<String>,
    pub submitted_at: Timestamp,
}

/// Problem report attached to a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub reason: ReportReason,
    pub description: String,
    pub evidence: Vec<String>,
    pub status: ReportStatus,
    pub filed_by: Actor,
    pub filed_at: Timestamp,
}

/// A receiver's reservation of a quantity of one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub food_id: FoodId,
    pub food_name: String,
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub receiver_id: ReceiverId,
    pub receiver_name: String,
    pub quantity: u32,
    pub delivery_method: DeliveryMethod,
    /// Single-use verification code. Never logged in clear.
    pub code: String,
    pub created_at: Timestamp,
    pub state: ClaimState,
    pub review: Option<Review>,
    pub report: Option<Report>,
}

impl Claim {
    pub fn status(&self) -> ClaimStatus {
        self.state.status()
    }

    pub fn is_scanned(&self) -> bool {
        self.state.is_scanned()
    }

    /// Flattens to the wire shape. The code is included only when
    /// `reveal_code` is set, i.e. for the claim's receiver.
    pub fn to_record(&self, reveal_code: bool) -> ClaimRecord {
        let courier = self.state.courier();
        let (closed_at, cancel_reason) = match &self.state {
            ClaimState::Active { .. } => (None, None),
            ClaimState::Completed { at, .. } => (Some(*at), None),
            ClaimState::Cancelled { at, reason, .. } => (Some(*at), reason.clone()),
        };

        ClaimRecord {
            id: self.id.clone(),
            food_id: self.food_id.clone(),
            food_name: self.food_name.clone(),
            provider_id: self.provider_id.clone(),
            provider_name: self.provider_name.clone(),
            receiver_id: self.receiver_id.clone(),
            receiver_name: self.receiver_name.clone(),
            claimed_quantity: self.quantity,
            delivery_method: self.delivery_method,
            status: self.status(),
            is_scanned: self.is_scanned(),
            unique_code: reveal_code.then(|| self.code.clone()),
            courier_id: courier.map(|c| c.id.clone()),
            courier_name: courier.map(|c| c.name.clone()),
            courier_status: self.state.courier_stage(),
            rating: self.review.as_ref().map(|r| r.rating),
            review: self.review.as_ref().map(|r| r.text.clone()),
            review_media: self
                .review
                .as_ref()
                .map(|r| r.media.clone())
                .unwrap_or_default(),
            report_reason: self.report.as_ref().map(|r| r.reason),
            report_description: self.report.as_ref().map(|r| r.description.clone()),
            report_evidence: self
                .report
                .as_ref()
                .and_then(|r| encode_evidence(&r.evidence)),
            report_status: self.report.as_ref().map(|r| r.status),
            cancel_reason,
            created_at: self.created_at,
            closed_at,
        }
    }
}
