//! # Inbound Port - ClaimLedgerApi
//!
//! Primary driving port of the ledger. The gateway's action router is its
//! only production caller; every method is atomic with respect to the others.
//!
//! | Method | Gateway action |
//! |--------|----------------|
//! | `process_claim` | `PROCESS_CLAIM` |
//! | `complete` / `cancel` / `assign_courier` / `start_delivery` | `UPDATE_CLAIM_STATUS` |
//! | `verify_code` | `VERIFY_ORDER_QR` |
//! | `submit_review` | `SUBMIT_REVIEW` |
//! | `submit_report` | `SUBMIT_REPORT` |
//! | `claims` | `GET_CLAIMS` |
//! | `inventory` | `GET_INVENTORY` |
//! | `add_food_item` | `ADD_FOOD_ITEM` |

use crate::domain::{LedgerError, LedgerSnapshot, LedgerStatus, ScanOutcome};
use shared_types::{
    Actor, ClaimFilter, ClaimId, ClaimRecord, CourierId, FoodItem, InventoryFilter, NewFoodItem,
    ProcessClaimRequest, SubmitReportRequest, SubmitReviewRequest, VerifyOrderRequest,
};

/// Primary API for the Claim Ledger.
pub trait ClaimLedgerApi: Send + Sync {
    /// Creates a claim and decrements stock atomically.
    ///
    /// # Errors
    /// - `FoodNotFound`, `OutsideWindow`, `DeliveryNotSupported`
    /// - `OutOfStock`, `QuantityOutOfRange`
    fn process_claim(&self, request: ProcessClaimRequest) -> Result<ClaimRecord, LedgerError>;

    /// Consumes a verification code (single check-and-set).
    fn verify_code(&self, request: &VerifyOrderRequest) -> ScanOutcome;

    /// `active → completed`.
    fn complete(&self, id: &ClaimId, actor: &Actor) -> Result<ClaimRecord, LedgerError>;

    /// `active → cancelled`.
    fn cancel(
        &self,
        id: &ClaimId,
        actor: &Actor,
        reason: Option<String>,
    ) -> Result<ClaimRecord, LedgerError>;

    /// Courier leg `unassigned → picking_up`.
    fn assign_courier(
        &self,
        id: &ClaimId,
        actor: &Actor,
        courier_id: CourierId,
        courier_name: String,
    ) -> Result<ClaimRecord, LedgerError>;

    /// Courier leg `picking_up → delivering`.
    fn start_delivery(&self, id: &ClaimId, actor: &Actor) -> Result<ClaimRecord, LedgerError>;

    fn submit_review(&self, request: SubmitReviewRequest) -> Result<ClaimRecord, LedgerError>;

    fn submit_report(&self, request: SubmitReportRequest) -> Result<ClaimRecord, LedgerError>;

    fn claims(&self, filter: &ClaimFilter) -> Vec<ClaimRecord>;

    fn inventory(&self, filter: &InventoryFilter) -> Vec<FoodItem>;

    /// Registers a listing; the ledger assigns its id.
    fn add_food_item(&self, item: NewFoodItem) -> Result<FoodItem, LedgerError>;

    fn status(&self) -> LedgerStatus;

    fn snapshot(&self) -> LedgerSnapshot;
}
