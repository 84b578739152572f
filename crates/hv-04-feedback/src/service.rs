//! # Feedback Service
//!
//! Receiver/provider client for reviews and reports.
//!
//! ```text
//! draft ──validate──→ cached-claim guard ──upload_all──→ SUBMIT_* ──→ patch cache
//!                                             │
//!                                             └─ failed assets dropped, submission continues
//! ```

use crate::domain::{FeedbackError, ReportDraft, ReviewDraft};
use crate::ports::MediaUploader;
use crate::uploads::{upload_all, UploadReport};
use shared_types::{
    encode_evidence, send, ClaimId, ClaimRecord, ClaimStatus, EntityCache, PersistenceGateway,
    SubmitReport, SubmitReportRequest, SubmitReview, SubmitReviewRequest,
};
use std::sync::Arc;
use tracing::info;

/// Accepted submission.
#[derive(Debug, Clone)]
pub struct FeedbackReceipt {
    pub record: ClaimRecord,
    pub uploads: UploadReport,
}

pub struct FeedbackService<G: PersistenceGateway> {
    gateway: G,
    uploader: Arc<dyn MediaUploader>,
    claims: Arc<EntityCache<ClaimRecord>>,
}

impl<G: PersistenceGateway> FeedbackService<G> {
    pub fn new(
        gateway: G,
        uploader: Arc<dyn MediaUploader>,
        claims: Arc<EntityCache<ClaimRecord>>,
    ) -> Self {
        Self {
            gateway,
            uploader,
            claims,
        }
    }

    /// Reviews a completed claim. Uploads run only after local checks pass.
    pub async fn submit_review(&self, draft: ReviewDraft) -> Result<FeedbackReceipt, FeedbackError> {
        draft.validate()?;
        let cached = self.cached(&draft.claim_id)?;
        if cached.status != ClaimStatus::Completed {
            return Err(FeedbackError::NotCompleted(draft.claim_id, cached.status));
        }
        if cached.rating.is_some() {
            return Err(FeedbackError::AlreadyReviewed(draft.claim_id));
        }

        let uploads = upload_all(self.uploader.as_ref(), &draft.media).await;
        let request = SubmitReviewRequest {
            claim_id: draft.claim_id,
            receiver_id: draft.receiver_id,
            rating: draft.rating,
            review: draft.text,
            review_media: uploads.urls.clone(),
        };
        let record = send::<SubmitReview, _>(&self.gateway, &request).await?;
        info!(
            claim_id = %record.id,
            rating = request.rating,
            media = uploads.urls.len(),
            failed = uploads.failures.len(),
            "review submitted"
        );
        Ok(self.accept(record, uploads))
    }

    /// Reports a claim in any state.
    pub async fn submit_report(&self, draft: ReportDraft) -> Result<FeedbackReceipt, FeedbackError> {
        draft.validate()?;
        let cached = self.cached(&draft.claim_id)?;
        if cached.report_reason.is_some() {
            return Err(FeedbackError::AlreadyReported(draft.claim_id));
        }

        let uploads = upload_all(self.uploader.as_ref(), &draft.evidence).await;
        let request = SubmitReportRequest {
            claim_id: draft.claim_id,
            reporter: draft.reporter,
            reason: draft.reason,
            description: draft.description,
            evidence: encode_evidence(&uploads.urls),
        };
        let record = send::<SubmitReport, _>(&self.gateway, &request).await?;
        info!(
            claim_id = %record.id,
            reason = ?request.reason,
            evidence = uploads.urls.len(),
            failed = uploads.failures.len(),
            "report submitted"
        );
        Ok(self.accept(record, uploads))
    }

    fn cached(&self, claim_id: &ClaimId) -> Result<ClaimRecord, FeedbackError> {
        self.claims
            .get(claim_id)
            .ok_or_else(|| FeedbackError::UnknownClaim(claim_id.clone()))
    }

    fn accept(&self, record: ClaimRecord, uploads: UploadReport) -> FeedbackReceipt {
        let patched = record.clone();
        self.claims.patch_by_id(&record.id, |c| *c = patched);
        FeedbackReceipt { record, uploads }
    }
}
