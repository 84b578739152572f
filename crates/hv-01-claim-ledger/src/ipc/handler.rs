//! Gateway command handler for the Claim Ledger.
//!
//! Turns typed gateway requests into ledger calls. The one non-trivial
//! mapping is `UPDATE_CLAIM_STATUS`, whose `(status, additionalData)` pair
//! selects one of four transitions:
//!
//! | `status` | `additionalData` | Transition |
//! |----------|------------------|------------|
//! | `completed` | `actor` | `complete` |
//! | `cancelled` | `actor`, `cancelReason?` | `cancel` |
//! | `active` | `actor`, `courierId`, `courierName`, `courierStatus: picking_up` | `assign_courier` |
//! | `active` | `actor`, `courierStatus: delivering` | `start_delivery` |
//!
//! Any request carrying `isScanned` is refused: only `VERIFY_ORDER_QR` sets it.

use crate::domain::{LedgerError, ScanOutcome};
use crate::ports::ClaimLedgerApi;
use shared_types::{
    ClaimFilter, ClaimRecord, ClaimStatus, CourierStatus, FoodItem, InventoryFilter, NewFoodItem,
    ProcessClaimRequest, SubmitReportRequest, SubmitReviewRequest, UpdateClaimStatusRequest,
    VerifyOrderRequest,
};
use std::sync::Arc;

/// Command handler over any ledger implementation.
#[derive(Clone)]
pub struct LedgerHandler {
    ledger: Arc<dyn ClaimLedgerApi>,
}

impl LedgerHandler {
    pub fn new(ledger: Arc<dyn ClaimLedgerApi>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<dyn ClaimLedgerApi> {
        &self.ledger
    }

    /// Handles `PROCESS_CLAIM`.
    pub fn handle_process_claim(
        &self,
        request: ProcessClaimRequest,
    ) -> Result<ClaimRecord, LedgerError> {
        if request.quantity_to_reduce == 0 {
            return Err(LedgerError::QuantityOutOfRange {
                requested: 0,
                min: 1,
                max: u32::MAX,
            });
        }
        self.ledger.process_claim(request)
    }

    /// Handles `UPDATE_CLAIM_STATUS`.
    pub fn handle_update_status(
        &self,
        request: UpdateClaimStatusRequest,
    ) -> Result<ClaimRecord, LedgerError> {
        let extras = request.additional_data;
        if extras.is_scanned.is_some() {
            return Err(LedgerError::ScanFlagReadOnly);
        }
        let actor = extras.actor.ok_or(LedgerError::MissingField("additionalData.actor"))?;

        match request.status {
            ClaimStatus::Completed => self.ledger.complete(&request.id, &actor),
            ClaimStatus::Cancelled => self.ledger.cancel(&request.id, &actor, extras.cancel_reason),
            ClaimStatus::Active => match extras.courier_status {
                Some(CourierStatus::PickingUp) => {
                    let courier_id = extras
                        .courier_id
                        .ok_or(LedgerError::MissingField("additionalData.courierId"))?;
                    let courier_name = extras
                        .courier_name
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| courier_id.to_string());
                    self.ledger
                        .assign_courier(&request.id, &actor, courier_id, courier_name)
                }
                Some(CourierStatus::Delivering) => self.ledger.start_delivery(&request.id, &actor),
                None => Err(LedgerError::InvalidTransition(
                    "status 'active' needs a courierStatus".to_string(),
                )),
            },
        }
    }

    /// Handles `VERIFY_ORDER_QR`.
    pub fn handle_verify(&self, request: &VerifyOrderRequest) -> ScanOutcome {
        self.ledger.verify_code(request)
    }

    /// Handles `SUBMIT_REVIEW`.
    pub fn handle_review(&self, request: SubmitReviewRequest) -> Result<ClaimRecord, LedgerError> {
        self.ledger.submit_review(request)
    }

    /// Handles `SUBMIT_REPORT`.
    pub fn handle_report(&self, request: SubmitReportRequest) -> Result<ClaimRecord, LedgerError> {
        self.ledger.submit_report(request)
    }

    /// Handles `GET_CLAIMS`.
    pub fn handle_get_claims(&self, filter: &ClaimFilter) -> Vec<ClaimRecord> {
        self.ledger.claims(filter)
    }

    /// Handles `GET_INVENTORY`.
    pub fn handle_get_inventory(&self, filter: &InventoryFilter) -> Vec<FoodItem> {
        self.ledger.inventory(filter)
    }

    /// Handles `ADD_FOOD_ITEM`.
    pub fn handle_add_food_item(&self, item: NewFoodItem) -> Result<FoodItem, LedgerError> {
        self.ledger.add_food_item(item)
    }
}
