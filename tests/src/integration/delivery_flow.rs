//! # Delivery Flow
//!
//! ```text
//! unassigned ──assign──→ picking_up ──scan──→ (scanned) ──start──→ delivering ──complete──→ completed
//! ```
//!
//! The courier dashboard and the provider's scanner share one claim cache,
//! so the scan unlocks `start_delivery` without a refresh.

use crate::support::*;
use hv_01_claim_ledger::{ClaimClient, ClaimClientError};
use hv_02_verification::{VerificationSession, Verifier};
use hv_03_distribution::{CourierContact, DistributionError, DistributionService, TaskStage};
use shared_types::{
    Actor, ClaimDraft, ClaimFilter, ClaimStatus, CourierId, CourierStatus, DeliveryCapability,
    DeliveryMethod, GatewayError, InventoryFilter,
};
use std::sync::Arc;

fn roster() -> Vec<CourierContact> {
    vec![
        CourierContact {
            id: CourierId::new("cour-1"),
            name: "Budi Santoso".into(),
            phone: Some("+62-811-0001".into()),
        },
        CourierContact {
            id: CourierId::new("cour-2"),
            name: "Eko".into(),
            phone: None,
        },
    ]
}

fn delivery_for(n: u32) -> ClaimDraft {
    ClaimDraft {
        receiver_id: receiver(n),
        receiver_name: format!("Receiver {n}"),
        delivery_method: DeliveryMethod::Delivery,
    }
}

#[tokio::test]
async fn test_courier_leg_end_to_end() {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Nasi kotak", 10, 5, DeliveryCapability::Both)
        .await
        .unwrap();

    let receiver_app = ClaimClient::new(gateway.clone());
    receiver_app
        .refresh_inventory(&InventoryFilter::default())
        .await
        .unwrap();
    let claim = receiver_app
        .create_claim(&food.id, 4, delivery_for(1))
        .await
        .unwrap();
    let code = claim.unique_code.clone().unwrap();

    let couriers = roster();
    let dispatch = DistributionService::new(
        gateway.clone(),
        Arc::new(TownDirectory {
            couriers: couriers.clone(),
        }),
    );
    assert_eq!(dispatch.refresh().await.unwrap(), 1);

    let worklist = dispatch.worklist();
    assert_eq!(worklist.len(), 1);
    assert_eq!(worklist[0].stage, TaskStage::Unassigned);
    assert_eq!(worklist[0].dropoff_address.as_deref(), Some("Jl. Melati recv-1"));

    let budi = Actor::Courier(couriers[0].id.clone());
    let assigned = dispatch
        .assign(&claim.id, budi.clone(), &couriers[0])
        .await
        .unwrap();
    assert_eq!(assigned.courier_status, Some(CourierStatus::PickingUp));

    // Second courier sees the claim as taken without a round-trip.
    let err = dispatch
        .assign(&claim.id, Actor::Courier(couriers[1].id.clone()), &couriers[1])
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::AlreadyAssigned { .. }));

    let err = dispatch
        .start_delivery(&claim.id, budi.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::NotScanned(_)));

    let mut scanner = VerificationSession::manual(
        gateway.clone(),
        Verifier {
            provider_id: provider(1),
            provider_name: "Stall 1".into(),
        },
    )
    .with_claim_cache(Arc::clone(dispatch.claims()));
    assert!(scanner.submit_code(&code).await.unwrap().is_success());

    let delivering = dispatch
        .start_delivery(&claim.id, budi.clone())
        .await
        .unwrap();
    assert_eq!(delivering.courier_status, Some(CourierStatus::Delivering));

    let contact = dispatch.courier_contact(&claim.id).unwrap();
    assert_eq!(contact.phone.as_deref(), Some("+62-811-0001"));

    let done = dispatch.complete_delivery(&claim.id, budi).await.unwrap();
    assert_eq!(done.status, ClaimStatus::Completed);
    assert_eq!(dispatch.worklist()[0].stage, TaskStage::Completed);
}

#[tokio::test]
async fn test_provider_cannot_complete_delivery_claim() {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Roti", 6, 2, DeliveryCapability::Delivery)
        .await
        .unwrap();
    let client = ClaimClient::new(gateway.clone());
    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    let claim = client.create_claim(&food.id, 2, delivery_for(2)).await.unwrap();
    client.refresh_claims(&ClaimFilter::default()).await.unwrap();

    let mut scanner = VerificationSession::manual(
        gateway.clone(),
        Verifier {
            provider_id: provider(1),
            provider_name: "Stall 1".into(),
        },
    )
    .with_claim_cache(Arc::clone(client.claims()));
    assert!(scanner
        .submit_code(claim.unique_code.as_deref().unwrap())
        .await
        .unwrap()
        .is_success());

    let err = client
        .confirm_completion(&claim.id, Actor::Provider(provider(1)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClaimClientError::Gateway(GatewayError::Rejected { .. })
    ));
}

#[tokio::test]
async fn test_worklist_orders_open_work_first() {
    let gateway = fresh_gateway();
    let food = list_food(&gateway, &provider(1), "Sayur", 20, 2, DeliveryCapability::Both)
        .await
        .unwrap();
    let client = ClaimClient::new(gateway.clone());
    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();

    let first = client.create_claim(&food.id, 1, delivery_for(1)).await.unwrap();
    let second = client.create_claim(&food.id, 1, delivery_for(2)).await.unwrap();
    // Pickup claims never reach the courier dashboard.
    client
        .create_claim(
            &food.id,
            1,
            ClaimDraft {
                delivery_method: DeliveryMethod::Pickup,
                ..delivery_for(3)
            },
        )
        .await
        .unwrap();

    let couriers = roster();
    let dispatch = DistributionService::new(
        gateway.clone(),
        Arc::new(TownDirectory {
            couriers: couriers.clone(),
        }),
    );
    dispatch.refresh().await.unwrap();
    dispatch
        .assign(&first.id, Actor::Admin, &couriers[1])
        .await
        .unwrap();

    let order: Vec<_> = dispatch.worklist().into_iter().map(|t| t.claim_id).collect();
    assert_eq!(order, vec![second.id, first.id]);
}
