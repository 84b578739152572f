//! Verification results and session modes.

use serde::{Deserialize, Serialize};
use shared_types::{ClaimId, GatewayError, VerifyFailure, VerifyOrderResponse};

/// How the operator supplies the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Camera,
    Manual,
}

/// Server verdict on a submitted code.
///
/// Each refusal is a distinct variant so the operator sees the specific
/// condition: a reused code is not the same as an unknown one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Success { claim_id: ClaimId, food_name: String },
    AlreadyScanned,
    WrongOwner,
    NotFound,
}

impl VerificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Operator-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::Success { food_name, .. } => format!("Verified: {food_name}"),
            Self::AlreadyScanned => "Code already used".to_string(),
            Self::WrongOwner => "This code belongs to another provider's claim".to_string(),
            Self::NotFound => "Code not recognised".to_string(),
        }
    }
}

impl TryFrom<VerifyOrderResponse> for VerificationOutcome {
    type Error = GatewayError;

    fn try_from(response: VerifyOrderResponse) -> Result<Self, Self::Error> {
        if response.success {
            let claim_id = response.claim_id.ok_or_else(|| {
                GatewayError::Malformed("VERIFY_ORDER_QR: success without claimId".into())
            })?;
            return Ok(Self::Success {
                claim_id,
                food_name: response.food_name.unwrap_or_default(),
            });
        }
        match response.message {
            Some(VerifyFailure::AlreadyScanned) => Ok(Self::AlreadyScanned),
            Some(VerifyFailure::WrongOwner) => Ok(Self::WrongOwner),
            Some(VerifyFailure::NotFound) => Ok(Self::NotFound),
            None => Err(GatewayError::Malformed(
                "VERIFY_ORDER_QR: refusal without reason".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_claim_id() {
        let response = VerifyOrderResponse {
            success: true,
            food_name: Some("Roti".into()),
            claim_id: None,
            message: None,
        };
        assert!(matches!(
            VerificationOutcome::try_from(response),
            Err(GatewayError::Malformed(_))
        ));
    }

    #[test]
    fn test_refusals_stay_distinct() {
        let already = VerificationOutcome::try_from(VerifyOrderResponse::refused(
            VerifyFailure::AlreadyScanned,
        ))
        .unwrap();
        let missing =
            VerificationOutcome::try_from(VerifyOrderResponse::refused(VerifyFailure::NotFound))
                .unwrap();

        assert_eq!(already, VerificationOutcome::AlreadyScanned);
        assert_eq!(missing, VerificationOutcome::NotFound);
        assert_ne!(already.message(), missing.message());
    }
}
