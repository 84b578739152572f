//! # HTTP Transport
//!
//! The same clients against a real socket: envelope framing, the
//! misrouted-URL case and the stock race under concurrent requests.

use crate::support::*;
use axum::{routing::post, Router};
use futures::future::join_all;
use hv_01_claim_ledger::{ClaimClient, ClaimClientError};
use hv_02_verification::{VerificationOutcome, VerificationSession, Verifier};
use hv_05_gateway::{ClientConfig, GatewayConfig, GatewayService, HttpGateway};
use shared_types::{
    Actor, ClaimDraft, ClaimFilter, ClaimStatus, DeliveryCapability, DeliveryMethod, ErrorClass,
    GatewayError, InventoryFilter, RejectionCode,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

async fn serve_fresh() -> (GatewayService, SocketAddr) {
    let mut service = GatewayService::new(GatewayConfig::default(), fresh_router());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = service.serve(listener).unwrap();
    (service, addr)
}

fn http(addr: SocketAddr) -> HttpGateway {
    HttpGateway::new(ClientConfig::for_addr(addr)).unwrap()
}

fn pickup_by(n: u32) -> ClaimDraft {
    ClaimDraft {
        receiver_id: receiver(n),
        receiver_name: format!("Receiver {n}"),
        delivery_method: DeliveryMethod::Pickup,
    }
}

#[tokio::test]
async fn test_pickup_flow_over_http() {
    let (mut service, addr) = serve_fresh().await;
    let gateway = http(addr);

    let food = list_food(&gateway, &provider(1), "Nasi kotak", 4, 2, DeliveryCapability::Pickup)
        .await
        .unwrap();
    let client = ClaimClient::new(gateway.clone());
    client.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    let claim = client.create_claim(&food.id, 2, pickup_by(1)).await.unwrap();
    client.refresh_claims(&ClaimFilter::default()).await.unwrap();

    let mut scanner = VerificationSession::manual(
        gateway.clone(),
        Verifier {
            provider_id: provider(1),
            provider_name: "Stall 1".into(),
        },
    )
    .with_claim_cache(std::sync::Arc::clone(client.claims()));
    let code = claim.unique_code.unwrap();
    assert!(scanner.submit_code(&code).await.unwrap().is_success());
    assert_eq!(
        scanner.submit_code(&code).await.unwrap(),
        VerificationOutcome::AlreadyScanned
    );

    let done = client
        .confirm_completion(&claim.id, Actor::Receiver(receiver(1)))
        .await
        .unwrap();
    assert_eq!(done.status, ClaimStatus::Completed);

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_server_rejection_carries_code() {
    let (mut service, addr) = serve_fresh().await;
    let gateway = http(addr);
    let food = list_food(&gateway, &provider(1), "Roti", 1, 1, DeliveryCapability::Pickup)
        .await
        .unwrap();

    let first = ClaimClient::new(gateway.clone());
    let second = ClaimClient::new(gateway.clone());
    first.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    second.refresh_inventory(&InventoryFilter::default()).await.unwrap();

    first.create_claim(&food.id, 1, pickup_by(1)).await.unwrap();
    // `second` still believes one portion is left.
    let err = second.create_claim(&food.id, 1, pickup_by(2)).await.unwrap_err();
    match err {
        ClaimClientError::Gateway(e) => {
            assert_eq!(e.code(), Some(RejectionCode::OutOfStock));
            assert_eq!(e.class(), ErrorClass::Conflict);
            assert!(!e.is_retryable());
        }
        other => panic!("expected a gateway rejection, got {other:?}"),
    }

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_html_endpoint_reported_as_misconfiguration() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(
        "/",
        post(|| async { "<html><head><title>502 Bad Gateway</title></head></html>" }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = ClaimClient::new(http(addr));
    let err = client
        .refresh_inventory(&InventoryFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Misconfigured { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_concurrent_claims_never_oversell() {
    let (mut service, addr) = serve_fresh().await;
    let gateway = http(addr);
    let food = list_food(&gateway, &provider(1), "Kue", 10, 1, DeliveryCapability::Pickup)
        .await
        .unwrap();

    let attempts = (0..25u32).map(|n| {
        let gateway = gateway.clone();
        let food_id = food.id.clone();
        async move {
            let client = ClaimClient::new(gateway);
            client.refresh_inventory(&InventoryFilter::default()).await?;
            client.create_claim(&food_id, 1, pickup_by(n)).await
        }
    });
    let results = join_all(attempts).await;

    let granted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(granted, 10);
    for refused in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(refused, ClaimClientError::Gateway(_) | ClaimClientError::Rejected(_)));
    }

    let check = ClaimClient::new(gateway);
    check.refresh_inventory(&InventoryFilter::default()).await.unwrap();
    assert_eq!(check.foods().get(&food.id).unwrap().current_quantity, 0);
    assert_eq!(check.refresh_claims(&ClaimFilter::default()).await.unwrap(), 10);

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_oversized_request_answered_with_envelope() {
    let mut config = GatewayConfig::default();
    config.limits.max_body_bytes = 64;
    let mut service = GatewayService::new(config, fresh_router());
    let addr = service
        .serve(TcpListener::bind("127.0.0.1:0").await.unwrap())
        .unwrap();
    let gateway = http(addr);

    let filter = ClaimFilter {
        receiver_id: Some(receiver(1_000_000_007)),
        provider_id: Some(provider(1_000_000_009)),
        status: Some(ClaimStatus::Active),
        delivery_method: Some(DeliveryMethod::Delivery),
        ..Default::default()
    };
    let err = shared_types::send::<shared_types::GetClaims, _>(&gateway, &filter)
        .await
        .unwrap_err();
    match err {
        GatewayError::Rejected { code, .. } => {
            assert_eq!(code, Some(RejectionCode::InvalidRequest))
        }
        other => panic!("expected an error envelope, got {other:?}"),
    }

    // Requests within the limit still go through on the same server.
    let small = shared_types::send::<shared_types::GetClaims, _>(&gateway, &ClaimFilter::default())
        .await
        .unwrap();
    assert!(small.is_empty());

    service.shutdown().await.unwrap();
}
