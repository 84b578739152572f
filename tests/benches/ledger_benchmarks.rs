//! # Harvest Ledger Benchmarks
//!
//! | Path | Expectation |
//! |------|-------------|
//! | `process_claim` | constant per claim, independent of claim count |
//! | `verify_code` | hash lookup, flat as claims grow |
//! | gateway dispatch | envelope decode dominates |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hv_01_claim_ledger::{
    ClaimLedger, ClaimLedgerApi, ClaimLedgerService, LedgerHandler, RandomCodeGenerator,
    SystemTimeSource,
};
use hv_05_gateway::ActionRouter;
use serde_json::json;
use shared_types::{
    ClaimDraft, DeliveryCapability, DeliveryMethod, DistributionWindow, GatewayRequest,
    InventoryFilter, NewFoodItem, ProcessClaimRequest, ProviderId, ReceiverId, VerifyOrderRequest,
};
use std::sync::Arc;

type Ledger = ClaimLedgerService<SystemTimeSource, RandomCodeGenerator>;

fn ledger_with_stock(stock: u32) -> Arc<Ledger> {
    let ledger = Arc::new(ClaimLedgerService::new(
        ClaimLedger::with_defaults(),
        SystemTimeSource,
        RandomCodeGenerator,
    ));
    ledger
        .add_food_item(NewFoodItem {
            provider_id: ProviderId::new("prov-1"),
            provider_name: "Warung Sari".into(),
            name: "Nasi kotak".into(),
            initial_quantity: stock,
            min_quantity: 1,
            max_quantity: 1,
            window: DistributionWindow::ALWAYS,
            delivery_capability: DeliveryCapability::Pickup,
        })
        .expect("listing");
    ledger
}

fn claim_request(ledger: &Ledger, n: u32) -> ProcessClaimRequest {
    ProcessClaimRequest {
        food_id: ledger.inventory(&InventoryFilter::default())[0].id.clone(),
        quantity_to_reduce: 1,
        claim_data: ClaimDraft {
            receiver_id: ReceiverId::new(format!("recv-{n}")),
            receiver_name: format!("Receiver {n}"),
            delivery_method: DeliveryMethod::Pickup,
        },
    }
}

fn bench_process_claim(c: &mut Criterion) {
    let mut group = c.benchmark_group("hv-01-process-claim");
    let ledger = ledger_with_stock(u32::MAX);
    let mut n = 0u32;

    group.throughput(Throughput::Elements(1));
    group.bench_function("single", |b| {
        b.iter(|| {
            n = n.wrapping_add(1);
            black_box(ledger.process_claim(claim_request(&ledger, n)).is_ok())
        })
    });
    group.finish();
}

fn bench_verify_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("hv-01-verify-code");

    for claims in [100u32, 1_000, 10_000] {
        let ledger = ledger_with_stock(claims);
        for n in 0..claims {
            ledger.process_claim(claim_request(&ledger, n)).expect("claim");
        }
        // Unknown codes never flip state, so every iteration does the same work.
        let miss = VerifyOrderRequest {
            unique_code: "ZZZZZZZZZZ".into(),
            scanned_by_provider_id: ProviderId::new("prov-1"),
            scanned_by_provider_name: "Warung Sari".into(),
        };
        group.bench_with_input(BenchmarkId::new("unknown_code", claims), &miss, |b, req| {
            b.iter(|| black_box(ledger.verify_code(req)))
        });
    }
    group.finish();
}

fn bench_gateway_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("hv-05-dispatch");
    let ledger = ledger_with_stock(1);
    let router = ActionRouter::new(LedgerHandler::new(ledger));

    group.bench_function("get_inventory", |b| {
        b.iter(|| {
            black_box(router.dispatch(GatewayRequest::new("GET_INVENTORY", json!({}))))
        })
    });
    group.bench_function("unknown_action", |b| {
        b.iter(|| black_box(router.dispatch(GatewayRequest::new("NOPE", json!({})))))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_process_claim,
    bench_verify_code,
    bench_gateway_dispatch
);
criterion_main!(benches);
