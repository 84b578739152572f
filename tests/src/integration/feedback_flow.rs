//! # Feedback Flow
//!
//! Reviews need a completed claim and land once; reports are allowed in any
//! state and carry their evidence URLs through the ledger intact.

use crate::support::*;
use hv_01_claim_ledger::ClaimClient;
use hv_02_verification::{VerificationSession, Verifier};
use hv_04_feedback::{FeedbackError, FeedbackService, MediaAsset, ReportDraft, ReviewDraft};
use hv_05_gateway::LocalGateway;
use shared_types::{
    decode_evidence, Actor, ClaimDraft, ClaimFilter, ClaimId, ClaimStatus, DeliveryCapability,
    DeliveryMethod, InventoryFilter, ReportReason,
};
use std::sync::Arc;

/// One pickup claim by `recv-1` on a `prov-1` listing, cached in the client.
async fn claimed() -> (LocalGateway, ClaimClient<LocalGateway>, ClaimId, String) {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Nasi kotak", 5, 2, DeliveryCapability::Pickup)
        .await
        .unwrap();
    let client = ClaimClient::new(gateway.clone());
    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    let claim = client
        .create_claim(
            &food.id,
            1,
            ClaimDraft {
                receiver_id: receiver(1),
                receiver_name: "Ani".into(),
                delivery_method: DeliveryMethod::Pickup,
            },
        )
        .await
        .unwrap();
    client.refresh_claims(&ClaimFilter::default()).await.unwrap();
    let code = claim.unique_code.unwrap();
    (gateway, client, claim.id, code)
}

fn review(claim_id: &ClaimId, rating: u8, media: Vec<MediaAsset>) -> ReviewDraft {
    ReviewDraft {
        claim_id: claim_id.clone(),
        receiver_id: receiver(1),
        rating,
        text: "Masih hangat, terima kasih".into(),
        media,
    }
}

#[tokio::test]
async fn test_review_after_completion_with_partial_uploads() {
    let (gateway, client, claim_id, code) = claimed().await;
    let store = Arc::new(MemoryMediaStore::default());
    let feedback = FeedbackService::new(gateway.clone(), store.clone(), Arc::clone(client.claims()));

    let err = feedback
        .submit_review(review(&claim_id, 5, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedbackError::NotCompleted(_, ClaimStatus::Active)));

    let mut scanner = VerificationSession::manual(
        gateway.clone(),
        Verifier {
            provider_id: provider(1),
            provider_name: "Stall 1".into(),
        },
    )
    .with_claim_cache(Arc::clone(client.claims()));
    assert!(scanner.submit_code(&code).await.unwrap().is_success());
    client
        .confirm_completion(&claim_id, Actor::Receiver(receiver(1)))
        .await
        .unwrap();

    let receipt = feedback
        .submit_review(review(
            &claim_id,
            5,
            vec![photo("plate.jpg"), photo("broken.jpg"), photo("bag.jpg")],
        ))
        .await
        .unwrap();
    assert!(!receipt.uploads.is_complete());
    assert_eq!(receipt.uploads.failures.len(), 1);
    assert_eq!(
        receipt.record.review_media,
        vec![
            "https://media.harvest.test/plate.jpg".to_string(),
            "https://media.harvest.test/bag.jpg".to_string(),
        ]
    );
    assert_eq!(client.claims().get(&claim_id).unwrap().rating, Some(5));

    let err = feedback
        .submit_review(review(&claim_id, 4, vec![photo("again.jpg")]))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedbackError::AlreadyReviewed(_)));
    assert_eq!(store.stored.lock().len(), 2, "second review must not upload");
}

#[tokio::test]
async fn test_invalid_rating_never_uploads() {
    let (gateway, client, claim_id, _) = claimed().await;
    let store = Arc::new(MemoryMediaStore::default());
    let feedback = FeedbackService::new(gateway, store.clone(), Arc::clone(client.claims()));

    let err = feedback
        .submit_review(review(&claim_id, 6, vec![photo("plate.jpg")]))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedbackError::InvalidRating(6)));
    assert!(store.stored.lock().is_empty());
}

#[tokio::test]
async fn test_report_on_active_claim_keeps_evidence() {
    let (gateway, client, claim_id, _) = claimed().await;
    let feedback = FeedbackService::new(
        gateway.clone(),
        Arc::new(MemoryMediaStore::default()),
        Arc::clone(client.claims()),
    );

    let err = feedback
        .submit_report(ReportDraft {
            claim_id: claim_id.clone(),
            reporter: Actor::Receiver(receiver(1)),
            reason: ReportReason::Other,
            description: "   ".into(),
            evidence: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FeedbackError::MissingDescription));

    feedback
        .submit_report(ReportDraft {
            claim_id: claim_id.clone(),
            reporter: Actor::Receiver(receiver(1)),
            reason: ReportReason::Spoiled,
            description: "Smelled sour".into(),
            evidence: vec![photo("box.jpg"), photo("label.jpg")],
        })
        .await
        .unwrap();

    // Read back through the ledger, not the local cache.
    client.refresh_claims(&ClaimFilter::default()).await.unwrap();
    let stored = client.claims().get(&claim_id).unwrap();
    assert_eq!(stored.status, ClaimStatus::Active);
    assert_eq!(stored.report_reason, Some(ReportReason::Spoiled));
    assert_eq!(
        decode_evidence(stored.report_evidence.as_deref().unwrap()),
        vec![
            "https://media.harvest.test/box.jpg".to_string(),
            "https://media.harvest.test/label.jpg".to_string(),
        ]
    );

    let err = feedback
        .submit_report(ReportDraft {
            claim_id,
            reporter: Actor::Provider(provider(1)),
            reason: ReportReason::NoShow,
            description: String::new(),
            evidence: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FeedbackError::AlreadyReported(_)));
}
