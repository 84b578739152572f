//! Thread-safe ledger service.
//!
//! Wraps [`ClaimLedger`] in a mutex so each API call is one critical
//! section: the stock check and decrement of `process_claim`, and the
//! check-and-set of `verify_code`, can never interleave with another call.
//!
//! With a snapshot path set, every successful mutation rewrites the snapshot
//! before the lock is released, so a consumed code stays consumed across a
//! crash.

use crate::domain::{
    save_snapshot, ClaimLedger, LedgerError, LedgerSnapshot, LedgerStatus, ScanOutcome,
};
use crate::ports::{ClaimLedgerApi, CodeGenerator, TimeSource};
use parking_lot::Mutex;
use shared_types::{
    Actor, ClaimFilter, ClaimId, ClaimRecord, CourierId, FoodId, FoodItem, InventoryFilter,
    NewFoodItem, ProcessClaimRequest, SubmitReportRequest, SubmitReviewRequest,
    VerifyOrderRequest,
};
use std::path::{Path, PathBuf};
use tracing::error;
use uuid::Uuid;

/// Ledger behind a lock, with its clock and code source.
pub struct ClaimLedgerService<T: TimeSource, C: CodeGenerator> {
    ledger: Mutex<ClaimLedger>,
    time_source: T,
    codes: C,
    snapshot_path: Option<PathBuf>,
}

impl<T: TimeSource, C: CodeGenerator> ClaimLedgerService<T, C> {
    pub fn new(ledger: ClaimLedger, time_source: T, codes: C) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            time_source,
            codes,
            snapshot_path: None,
        }
    }

    /// Writes the snapshot to `path` after every successful mutation.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Runs `f` with exclusive access to the ledger.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&mut ClaimLedger) -> R) -> R {
        f(&mut *self.ledger.lock())
    }

    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut ClaimLedger) -> Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        let mut ledger = self.ledger.lock();
        let result = f(&mut *ledger);
        if result.is_ok() {
            self.write_through(&ledger);
        }
        result
    }

    // A failed write is logged, not returned: the mutation has already
    // happened and the caller must not retry it.
    fn write_through(&self, ledger: &ClaimLedger) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        if let Err(e) = save_snapshot(path, &ledger.snapshot()) {
            error!(path = %path.display(), error = %e, "snapshot write failed");
        }
    }
}

impl<T: TimeSource, C: CodeGenerator> ClaimLedgerApi for ClaimLedgerService<T, C> {
    fn process_claim(&self, request: ProcessClaimRequest) -> Result<ClaimRecord, LedgerError> {
        let now = self.time_source.now();
        let id = ClaimId::new(Uuid::new_v4().to_string());
        self.mutate(|l| l.process_claim(request, id, now, &self.codes))
    }

    fn verify_code(&self, request: &VerifyOrderRequest) -> ScanOutcome {
        let mut ledger = self.ledger.lock();
        let outcome = ledger.verify_code(&request.unique_code, &request.scanned_by_provider_id);
        if outcome.is_accepted() {
            self.write_through(&ledger);
        }
        outcome
    }

    fn complete(&self, id: &ClaimId, actor: &Actor) -> Result<ClaimRecord, LedgerError> {
        let now = self.time_source.now();
        self.mutate(|l| l.complete(id, actor, now))
    }

    fn cancel(
        &self,
        id: &ClaimId,
        actor: &Actor,
        reason: Option<String>,
    ) -> Result<ClaimRecord, LedgerError> {
        let now = self.time_source.now();
        self.mutate(|l| l.cancel(id, actor, reason, now))
    }

    fn assign_courier(
        &self,
        id: &ClaimId,
        actor: &Actor,
        courier_id: CourierId,
        courier_name: String,
    ) -> Result<ClaimRecord, LedgerError> {
        self.mutate(|l| l.assign_courier(id, actor, courier_id, courier_name))
    }

    fn start_delivery(&self, id: &ClaimId, actor: &Actor) -> Result<ClaimRecord, LedgerError> {
        self.mutate(|l| l.start_delivery(id, actor))
    }

    fn submit_review(&self, request: SubmitReviewRequest) -> Result<ClaimRecord, LedgerError> {
        let now = self.time_source.now();
        self.mutate(|l| l.submit_review(request, now))
    }

    fn submit_report(&self, request: SubmitReportRequest) -> Result<ClaimRecord, LedgerError> {
        let now = self.time_source.now();
        self.mutate(|l| l.submit_report(request, now))
    }

    fn claims(&self, filter: &ClaimFilter) -> Vec<ClaimRecord> {
        self.ledger.lock().claims(filter)
    }

    fn inventory(&self, filter: &InventoryFilter) -> Vec<FoodItem> {
        self.ledger.lock().inventory(filter)
    }

    fn add_food_item(&self, item: NewFoodItem) -> Result<FoodItem, LedgerError> {
        let id = FoodId::new(Uuid::new_v4().to_string());
        self.mutate(|l| l.add_food_item(item, id))
    }

    fn status(&self) -> LedgerStatus {
        self.ledger.lock().status()
    }

    fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.lock().snapshot()
    }
}
