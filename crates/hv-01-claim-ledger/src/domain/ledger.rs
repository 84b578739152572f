//! # Claim Ledger - Inventory and Claims
//!
//! Authoritative store for listings and claims.
//!
//! ## Data Structures
//!
//! - `foods` / `food_index`: listings in registration order, O(1) by id
//! - `claims` / `claim_index`: claims in creation order, O(1) by id
//! - `code_index`: verification code -> claim, O(1) lookup for scans
//!
//! ## Invariants Enforced
//!
//! - Stock never negative: the allocator's bounds are re-checked inside
//!   `process_claim`, in the same `&mut self` call as the decrement.
//! - Sum of claimed quantities per listing never exceeds `initialQuantity`.
//! - A code is consumed at most once (`verify_code` is a single check-and-set).
//! - `isScanned` and terminal status are monotonic (see `lifecycle`).
//!
//! Callers share a ledger behind a lock; each method is one atomic step.

use super::allocator::allocation_bounds;
use super::codes::{code_fingerprint, normalize_code};
use super::entities::{Claim, ClaimState, LedgerConfig};
use super::errors::LedgerError;
use super::value_objects::{LedgerStatus, ScanOutcome};
use crate::ports::CodeGenerator;
use shared_types::{
    decode_evidence, Actor, ClaimFilter, ClaimId, ClaimRecord, ClaimStatus, CourierId, FoodId,
    FoodItem, InventoryFilter, NewFoodItem, ProcessClaimRequest, ProviderId, SubmitReportRequest,
    SubmitReviewRequest, Timestamp,
};
use std::collections::HashMap;

/// Inventory and claim store.
#[derive(Debug, Default)]
pub struct ClaimLedger {
    config: LedgerConfig,
    foods: Vec<FoodItem>,
    food_index: HashMap<FoodId, usize>,
    claims: Vec<Claim>,
    claim_index: HashMap<ClaimId, usize>,
    code_index: HashMap<String, usize>,
}

impl ClaimLedger {
    /// Creates an empty ledger.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Creates a ledger with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LedgerConfig::default())
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn food(&self, id: &FoodId) -> Option<&FoodItem> {
        self.food_index.get(id).map(|&i| &self.foods[i])
    }

    pub fn claim(&self, id: &ClaimId) -> Option<&Claim> {
        self.claim_index.get(id).map(|&i| &self.claims[i])
    }

    pub fn foods(&self) -> &[FoodItem] {
        &self.foods
    }

    pub fn all_claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Sum of quantities claimed against a listing, cancelled claims included.
    pub fn claimed_total(&self, food_id: &FoodId) -> u32 {
        self.claims
            .iter()
            .filter(|c| c.food_id == *food_id)
            .map(|c| c.quantity)
            .sum()
    }

    pub fn status(&self) -> LedgerStatus {
        let mut status = LedgerStatus {
            listings: self.foods.len(),
            claims: self.claims.len(),
            ..Default::default()
        };
        for claim in &self.claims {
            match claim.status() {
                ClaimStatus::Active => status.active_claims += 1,
                ClaimStatus::Completed => status.completed_claims += 1,
                ClaimStatus::Cancelled => status.cancelled_claims += 1,
            }
        }
        status
    }

    fn claim_mut(&mut self, id: &ClaimId) -> Result<&mut Claim, LedgerError> {
        match self.claim_index.get(id) {
            Some(&i) => Ok(&mut self.claims[i]),
            None => Err(LedgerError::ClaimNotFound(id.clone())),
        }
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    /// Registers a fully formed listing (seeding, snapshot restore).
    pub fn insert_food_item(&mut self, item: FoodItem) -> Result<(), LedgerError> {
        item.validate()?;
        if self.food_index.contains_key(&item.id) {
            return Err(LedgerError::DuplicateListing(item.id));
        }
        self.food_index.insert(item.id.clone(), self.foods.len());
        self.foods.push(item);
        Ok(())
    }

    /// Registers a provider's new listing under `id`.
    pub fn add_food_item(&mut self, new: NewFoodItem, id: FoodId) -> Result<FoodItem, LedgerError> {
        let item = new.into_item(id);
        self.insert_food_item(item.clone())?;
        tracing::info!(food_id = %item.id, provider_id = %item.provider_id, quantity = item.initial_quantity, "listing registered");
        Ok(item)
    }

    // =========================================================================
    // CLAIM CREATION
    // =========================================================================

    /// Creates a claim and decrements stock in one step.
    ///
    /// Returns the receiver's view of the claim, verification code included.
    ///
    /// # Errors
    /// - `FoodNotFound`, `OutsideWindow`, `DeliveryNotSupported`
    /// - `OutOfStock` when nothing is left
    /// - `QuantityOutOfRange` when the request falls outside the allocator's bounds
    pub fn process_claim(
        &mut self,
        request: ProcessClaimRequest,
        claim_id: ClaimId,
        now: Timestamp,
        codes: &dyn CodeGenerator,
    ) -> Result<ClaimRecord, LedgerError> {
        let food_pos = *self
            .food_index
            .get(&request.food_id)
            .ok_or_else(|| LedgerError::FoodNotFound(request.food_id.clone()))?;
        let food = &self.foods[food_pos];

        if !food.window.contains(now) {
            return Err(LedgerError::OutsideWindow {
                now,
                window: food.window,
            });
        }

        let method = request.claim_data.delivery_method;
        if !food.delivery_capability.supports(method) {
            return Err(LedgerError::DeliveryNotSupported {
                method,
                capability: food.delivery_capability,
            });
        }

        let bounds = allocation_bounds(food)?;
        bounds.check(request.quantity_to_reduce)?;

        let code = self.fresh_code(codes)?;

        let food = &mut self.foods[food_pos];
        food.current_quantity -= request.quantity_to_reduce;

        let claim = Claim {
            id: claim_id,
            food_id: food.id.clone(),
            food_name: food.name.clone(),
            provider_id: food.provider_id.clone(),
            provider_name: food.provider_name.clone(),
            receiver_id: request.claim_data.receiver_id,
            receiver_name: request.claim_data.receiver_name,
            quantity: request.quantity_to_reduce,
            delivery_method: method,
            code,
            created_at: now,
            state: ClaimState::Active {
                scanned: false,
                courier: None,
            },
            review: None,
            report: None,
        };

        tracing::info!(
            claim_id = %claim.id,
            food_id = %claim.food_id,
            quantity = claim.quantity,
            remaining = food.current_quantity,
            code = %code_fingerprint(&claim.code),
            "claim created"
        );

        let record = claim.to_record(true);
        let pos = self.claims.len();
        self.claim_index.insert(claim.id.clone(), pos);
        self.code_index.insert(claim.code.clone(), pos);
        self.claims.push(claim);
        Ok(record)
    }

    fn fresh_code(&self, codes: &dyn CodeGenerator) -> Result<String, LedgerError> {
        for _ in 0..self.config.max_code_attempts {
            let code = codes.generate(self.config.code_length);
            if !code.is_empty() && !self.code_index.contains_key(&code) {
                return Ok(code);
            }
            tracing::debug!(code = %code_fingerprint(&code), "verification code collision, drawing again");
        }
        Err(LedgerError::CodeSpaceExhausted(self.config.max_code_attempts))
    }

    // =========================================================================
    // VERIFICATION
    // =========================================================================

    /// Consumes a verification code.
    ///
    /// Single check-and-set: find code, check not yet scanned, check owner,
    /// set scanned. A cancelled claim that was never scanned no longer
    /// accepts its code and reports `NotFound`.
    pub fn verify_code(&mut self, raw_code: &str, provider_id: &ProviderId) -> ScanOutcome {
        let code = normalize_code(raw_code);
        let fingerprint = code_fingerprint(code);

        let Some(&pos) = self.code_index.get(code) else {
            tracing::info!(code = %fingerprint, provider_id = %provider_id, "verification: code not found");
            return ScanOutcome::NotFound;
        };
        let claim = &mut self.claims[pos];

        let outcome = match &claim.state {
            ClaimState::Cancelled { scanned: false, .. } => ScanOutcome::NotFound,
            ClaimState::Cancelled { scanned: true, .. }
            | ClaimState::Completed { .. }
            | ClaimState::Active { scanned: true, .. } => ScanOutcome::AlreadyScanned,
            ClaimState::Active { scanned: false, .. } if claim.provider_id != *provider_id => {
                ScanOutcome::WrongOwner
            }
            ClaimState::Active { scanned: false, .. } => match claim.mark_scanned() {
                Ok(()) => ScanOutcome::Accepted {
                    claim_id: claim.id.clone(),
                    food_name: claim.food_name.clone(),
                },
                Err(_) => ScanOutcome::NotFound,
            },
        };

        tracing::info!(
            claim_id = %claim.id,
            code = %fingerprint,
            provider_id = %provider_id,
            outcome = outcome.label(),
            "verification"
        );
        outcome
    }

    // =========================================================================
    // STATUS TRANSITIONS
    // =========================================================================

    pub fn complete(
        &mut self,
        id: &ClaimId,
        actor: &Actor,
        now: Timestamp,
    ) -> Result<ClaimRecord, LedgerError> {
        let claim = self.claim_mut(id)?;
        claim.complete(actor, now)?;
        tracing::info!(claim_id = %id, "claim completed");
        Ok(claim.to_record(false))
    }

    pub fn cancel(
        &mut self,
        id: &ClaimId,
        actor: &Actor,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<ClaimRecord, LedgerError> {
        let claim = self.claim_mut(id)?;
        claim.cancel(actor, reason, now)?;
        tracing::info!(claim_id = %id, "claim cancelled");
        Ok(claim.to_record(false))
    }

    pub fn assign_courier(
        &mut self,
        id: &ClaimId,
        actor: &Actor,
        courier_id: CourierId,
        courier_name: String,
    ) -> Result<ClaimRecord, LedgerError> {
        let claim = self.claim_mut(id)?;
        claim.assign_courier(actor, courier_id, courier_name)?;
        tracing::info!(claim_id = %id, courier_id = ?claim.state.courier().map(|c| &c.id), "courier assigned");
        Ok(claim.to_record(false))
    }

    pub fn start_delivery(&mut self, id: &ClaimId, actor: &Actor) -> Result<ClaimRecord, LedgerError> {
        let claim = self.claim_mut(id)?;
        claim.start_delivery(actor)?;
        tracing::info!(claim_id = %id, "courier out for delivery");
        Ok(claim.to_record(false))
    }

    // =========================================================================
    // FEEDBACK
    // =========================================================================

    pub fn submit_review(
        &mut self,
        request: SubmitReviewRequest,
        now: Timestamp,
    ) -> Result<ClaimRecord, LedgerError> {
        let claim = self.claim_mut(&request.claim_id)?;
        claim.attach_review(
            &request.receiver_id,
            request.rating,
            request.review,
            request.review_media,
            now,
        )?;
        tracing::info!(claim_id = %claim.id, rating = request.rating, "review attached");
        Ok(claim.to_record(false))
    }

    pub fn submit_report(
        &mut self,
        request: SubmitReportRequest,
        now: Timestamp,
    ) -> Result<ClaimRecord, LedgerError> {
        let evidence = request
            .evidence
            .as_deref()
            .map(decode_evidence)
            .unwrap_or_default();
        let claim = self.claim_mut(&request.claim_id)?;
        claim.attach_report(
            request.reporter,
            request.reason,
            request.description,
            evidence,
            now,
        )?;
        tracing::info!(claim_id = %claim.id, reason = ?request.reason, "report filed");
        Ok(claim.to_record(false))
    }

    // =========================================================================
    // READ-BACK
    // =========================================================================

    /// Claims matching `filter`, in creation order. Codes are included only
    /// when the filter pins a receiver, i.e. a receiver reading their own claims.
    pub fn claims(&self, filter: &ClaimFilter) -> Vec<ClaimRecord> {
        let reveal = filter.receiver_id.is_some();
        self.claims
            .iter()
            .map(|c| c.to_record(reveal))
            .filter(|r| filter.matches(r))
            .collect()
    }

    /// Listings matching `filter`, in registration order.
    pub fn inventory(&self, filter: &InventoryFilter) -> Vec<FoodItem> {
        self.foods
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect()
    }

    /// Rebuilds the lookup indexes from the ordered vectors.
    pub(crate) fn from_parts(
        config: LedgerConfig,
        foods: Vec<FoodItem>,
        claims: Vec<Claim>,
    ) -> Self {
        let food_index = foods
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        let claim_index = claims
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        let code_index = claims
            .iter()
            .enumerate()
            .map(|(i, c)| (c.code.clone(), i))
            .collect();
        Self {
            config,
            foods,
            food_index,
            claims,
            claim_index,
            code_index,
        }
    }
}
