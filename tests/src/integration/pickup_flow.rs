//! # Pickup Flow
//!
//! Receiver claims, provider verifies the handover code, receiver confirms.
//!
//! ```text
//! ClaimClient ──PROCESS_CLAIM──→ ledger        (stock decremented, code issued)
//! VerificationSession ──VERIFY_ORDER_QR──→ ledger (scan latch set once)
//! ClaimClient ──UPDATE_CLAIM_STATUS──→ ledger  (completed)
//! ```

use crate::support::*;
use hv_01_claim_ledger::{ClaimClient, ClaimClientError, LedgerError};
use hv_02_verification::{
    MediaTracks, ScanMode, VerificationOutcome, VerificationSession, Verifier,
};
use shared_types::{
    Actor, ClaimDraft, ClaimFilter, ClaimStatus, DeliveryCapability, DeliveryMethod,
    InventoryFilter,
};
use std::sync::Arc;

fn verifier(n: u32) -> Verifier {
    Verifier {
        provider_id: provider(n),
        provider_name: format!("Stall {n}"),
    }
}

fn pickup_by(n: u32) -> ClaimDraft {
    ClaimDraft {
        receiver_id: receiver(n),
        receiver_name: format!("Receiver {n}"),
        delivery_method: DeliveryMethod::Pickup,
    }
}

#[tokio::test]
async fn test_claim_verify_complete() {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Nasi kotak", 10, 3, DeliveryCapability::Both)
        .await
        .unwrap();

    let receiver_app = ClaimClient::new(gateway.clone());
    receiver_app
        .refresh_inventory(&InventoryFilter::default())
        .await
        .unwrap();
    let claim = receiver_app
        .create_claim(&food.id, 3, pickup_by(1))
        .await
        .unwrap();
    assert_eq!(receiver_app.foods().get(&food.id).unwrap().current_quantity, 7);
    let code = claim.unique_code.clone().unwrap();
    receiver_app
        .refresh_claims(&ClaimFilter::for_receiver(receiver(1)))
        .await
        .unwrap();

    // Completion is refused locally until the scan is known.
    let early = receiver_app
        .confirm_completion(&claim.id, Actor::Receiver(receiver(1)))
        .await
        .unwrap_err();
    assert!(matches!(early, ClaimClientError::Rejected(LedgerError::NotScanned(_))));

    let mut session = VerificationSession::manual(gateway.clone(), verifier(1));
    let outcome = session.submit_code(&format!("  {code} ")).await.unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Success {
            claim_id: claim.id.clone(),
            food_name: "Nasi kotak".into(),
        }
    );

    receiver_app
        .refresh_claims(&ClaimFilter::for_receiver(receiver(1)))
        .await
        .unwrap();
    let done = receiver_app
        .confirm_completion(&claim.id, Actor::Receiver(receiver(1)))
        .await
        .unwrap();
    assert_eq!(done.status, ClaimStatus::Completed);
    assert!(done.is_scanned);
}

#[tokio::test]
async fn test_second_device_sees_already_scanned() {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Roti", 5, 2, DeliveryCapability::Pickup)
        .await
        .unwrap();
    let client = ClaimClient::new(gateway.clone());
    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    let claim = client.create_claim(&food.id, 1, pickup_by(1)).await.unwrap();
    let code = claim.unique_code.unwrap();

    let mut counter = VerificationSession::manual(gateway.clone(), verifier(1));
    let mut tablet = VerificationSession::manual(gateway.clone(), verifier(1));

    assert!(counter.submit_code(&code).await.unwrap().is_success());
    assert_eq!(
        tablet.submit_code(&code).await.unwrap(),
        VerificationOutcome::AlreadyScanned
    );
}

#[tokio::test]
async fn test_other_provider_cannot_consume_code() {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Sayur", 5, 2, DeliveryCapability::Pickup)
        .await
        .unwrap();
    let client = ClaimClient::new(gateway.clone());
    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    let claim = client.create_claim(&food.id, 2, pickup_by(1)).await.unwrap();
    let code = claim.unique_code.unwrap();

    let mut stranger = VerificationSession::manual(gateway.clone(), verifier(2));
    assert_eq!(
        stranger.submit_code(&code).await.unwrap(),
        VerificationOutcome::WrongOwner
    );

    // The refusal did not burn the code for its owner.
    let mut owner = VerificationSession::manual(gateway.clone(), verifier(1));
    assert!(owner.submit_code(&code).await.unwrap().is_success());

    assert_eq!(
        owner.submit_code("NOSUCHCODE").await.unwrap(),
        VerificationOutcome::NotFound
    );
}

#[tokio::test]
async fn test_camera_scan_marks_shared_cache_and_releases_camera() {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Bubur", 4, 1, DeliveryCapability::Pickup)
        .await
        .unwrap();
    let client = ClaimClient::new(gateway.clone());
    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    let claim = client.create_claim(&food.id, 1, pickup_by(3)).await.unwrap();
    let code = claim.unique_code.clone().unwrap();
    client.refresh_claims(&ClaimFilter::default()).await.unwrap();

    let camera = ScriptedCamera::showing(vec![blank_frame(), blank_frame(), code_frame(&code)]);
    let mut session =
        VerificationSession::open(gateway.clone(), verifier(1), &camera, Arc::new(TextDecoder))
            .await
            .with_claim_cache(Arc::clone(client.claims()));
    assert_eq!(session.mode(), ScanMode::Camera);

    let outcome = session.scan_once().await.unwrap();
    assert!(outcome.is_success());
    assert!(!session.is_scanning());
    assert_eq!(camera.tracks.live_count(), 0);
    assert!(client.claims().get(&claim.id).unwrap().is_scanned);

    // Cache already knows about the scan; no refresh needed.
    let done = client
        .confirm_completion(&claim.id, Actor::Provider(provider(1)))
        .await
        .unwrap();
    assert_eq!(done.status, ClaimStatus::Completed);
}

#[tokio::test]
async fn test_denied_camera_falls_back_to_manual() {
    let gateway = fresh_gateway();
    let session =
        VerificationSession::open(gateway, verifier(1), &DeniedCamera, Arc::new(TextDecoder)).await;
    assert_eq!(session.mode(), ScanMode::Manual);
    assert!(session.fallback_reason().is_some());
}

#[tokio::test]
async fn test_cancelled_claim_keeps_stock_and_blocks_completion() {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Kue", 3, 3, DeliveryCapability::Pickup)
        .await
        .unwrap();
    let client = ClaimClient::new(gateway.clone());
    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    let claim = client.create_claim(&food.id, 2, pickup_by(1)).await.unwrap();
    client.refresh_claims(&ClaimFilter::default()).await.unwrap();

    let cancelled = client
        .cancel_claim(&claim.id, Actor::Receiver(receiver(1)), Some("changed plans".into()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, ClaimStatus::Cancelled);

    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    assert_eq!(client.foods().get(&food.id).unwrap().current_quantity, 1);

    let err = client
        .confirm_completion(&claim.id, Actor::Receiver(receiver(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimClientError::Rejected(LedgerError::AlreadyCancelled(_))));

    // A cancelled claim's code no longer verifies.
    let mut session = VerificationSession::manual(gateway.clone(), verifier(1));
    assert_eq!(
        session.submit_code(claim.unique_code.as_deref().unwrap()).await.unwrap(),
        VerificationOutcome::NotFound
    );
}
