//! Value objects returned by the ledger.

use serde::{Deserialize, Serialize};
use shared_types::{ClaimId, VerifyFailure, VerifyOrderResponse};

/// Result of one verification code submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Code consumed; the claim is now scanned.
    Accepted { claim_id: ClaimId, food_name: String },
    /// Code was consumed earlier.
    AlreadyScanned,
    /// Code belongs to another provider's claim.
    WrongOwner,
    /// No live claim carries this code.
    NotFound,
}

impl ScanOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted { .. } => "success",
            Self::AlreadyScanned => "already_scanned",
            Self::WrongOwner => "wrong_owner",
            Self::NotFound => "not_found",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl From<ScanOutcome> for VerifyOrderResponse {
    fn from(outcome: ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::Accepted {
                claim_id,
                food_name,
            } => VerifyOrderResponse::accepted(food_name, claim_id),
            ScanOutcome::AlreadyScanned => VerifyOrderResponse::refused(VerifyFailure::AlreadyScanned),
            ScanOutcome::WrongOwner => VerifyOrderResponse::refused(VerifyFailure::WrongOwner),
            ScanOutcome::NotFound => VerifyOrderResponse::refused(VerifyFailure::NotFound),
        }
    }
}

/// Ledger counters for health reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatus {
    pub listings: usize,
    pub claims: usize,
    pub active_claims: usize,
    pub completed_claims: usize,
    pub cancelled_claims: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_to_wire() {
        let resp: VerifyOrderResponse = ScanOutcome::WrongOwner.into();
        assert!(!resp.success);
        assert_eq!(resp.message, Some(VerifyFailure::WrongOwner));

        let resp: VerifyOrderResponse = ScanOutcome::Accepted {
            claim_id: ClaimId::new("c1"),
            food_name: "Roti".into(),
        }
        .into();
        assert!(resp.success);
        assert_eq!(resp.food_name.as_deref(), Some("Roti"));
    }

    #[test]
    fn test_labels_distinct() {
        let labels = [
            ScanOutcome::AlreadyScanned.label(),
            ScanOutcome::WrongOwner.label(),
            ScanOutcome::NotFound.label(),
        ];
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);
        assert_ne!(labels[1], labels[2]);
    }
}
