//! Review and report drafts.
//!
//! A draft holds what the user entered, attachments included, before
//! anything is uploaded. `validate` runs before any network call.

use crate::domain::errors::FeedbackError;
use crate::ports::MediaAsset;
use shared_types::{Actor, ClaimId, ReceiverId, ReportReason};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub claim_id: ClaimId,
    pub receiver_id: ReceiverId,
    pub rating: u8,
    pub text: String,
    pub media: Vec<MediaAsset>,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), FeedbackError> {
        if (MIN_RATING..=MAX_RATING).contains(&self.rating) {
            Ok(())
        } else {
            Err(FeedbackError::InvalidRating(self.rating))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub claim_id: ClaimId,
    pub reporter: Actor,
    pub reason: ReportReason,
    pub description: String,
    pub evidence: Vec<MediaAsset>,
}

impl ReportDraft {
    pub fn validate(&self) -> Result<(), FeedbackError> {
        if self.reason.requires_description() && self.description.trim().is_empty() {
            return Err(FeedbackError::MissingDescription);
        }
        Ok(())
    }
}
