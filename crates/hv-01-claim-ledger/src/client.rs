//! # Claim Client
//!
//! Client-side view of the ledger: the receiver's claim form and the
//! provider's completion button.
//!
//! The client keeps two [`EntityCache`]s (listings and claims) that are only
//! ever written with data the gateway returned. Checks done here are
//! advisory and exist to avoid round-trips that would certainly fail; the
//! ledger repeats every one of them.
//!
//! | Operation | Local guard | On success |
//! |-----------|-------------|------------|
//! | `create_claim` | capability, allocation bounds | listing stock patched |
//! | `confirm_completion` | cached, active, scanned | claim patched |
//! | `cancel_claim` | cached, active | claim patched |

use crate::domain::{allocation_bounds, AllocationBounds, LedgerError};
use shared_types::{
    send, Actor, ClaimDraft, ClaimFilter, ClaimId, ClaimRecord, ClaimStatus, EntityCache,
    ErrorClass, FoodId, FoodItem, GatewayError, GetClaims, GetInventory, InventoryFilter,
    PersistenceGateway, ProcessClaim, ProcessClaimRequest, UpdateClaimStatus,
    UpdateClaimStatusRequest,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by [`ClaimClient`].
#[derive(Debug, Error)]
pub enum ClaimClientError {
    /// Listing is not in the local cache; refresh inventory first.
    #[error("Listing {0} is not loaded")]
    UnknownListing(FoodId),

    /// Claim is not in the local cache; refresh claims first.
    #[error("Claim {0} is not loaded")]
    UnknownClaim(ClaimId),

    /// Refused locally before any request was sent.
    #[error(transparent)]
    Rejected(#[from] LedgerError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ClaimClientError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownListing(_) | Self::UnknownClaim(_) => ErrorClass::Resource,
            Self::Rejected(e) => e.code().class(),
            Self::Gateway(e) => e.class(),
        }
    }
}

/// Claim operations over a persistence gateway, with reconciled caches.
pub struct ClaimClient<G: PersistenceGateway> {
    gateway: G,
    foods: Arc<EntityCache<FoodItem>>,
    claims: Arc<EntityCache<ClaimRecord>>,
}

impl<G: PersistenceGateway> ClaimClient<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_caches(gateway, Arc::default(), Arc::default())
    }

    /// Shares caches with other clients (distribution dashboard, scanner).
    pub fn with_caches(
        gateway: G,
        foods: Arc<EntityCache<FoodItem>>,
        claims: Arc<EntityCache<ClaimRecord>>,
    ) -> Self {
        Self {
            gateway,
            foods,
            claims,
        }
    }

    pub fn foods(&self) -> &Arc<EntityCache<FoodItem>> {
        &self.foods
    }

    pub fn claims(&self) -> &Arc<EntityCache<ClaimRecord>> {
        &self.claims
    }

    /// Reloads listings. Returns the number cached.
    pub async fn refresh_inventory(&self, filter: &InventoryFilter) -> Result<usize, GatewayError> {
        let items = send::<GetInventory, _>(&self.gateway, filter).await?;
        let count = items.len();
        self.foods.replace_all(items);
        Ok(count)
    }

    /// Reloads claims. Returns the number cached.
    pub async fn refresh_claims(&self, filter: &ClaimFilter) -> Result<usize, GatewayError> {
        let records = send::<GetClaims, _>(&self.gateway, filter).await?;
        let count = records.len();
        self.claims.replace_all(records);
        Ok(count)
    }

    /// Claimable range for a cached listing.
    pub fn allowed_range(&self, food_id: &FoodId) -> Result<AllocationBounds, ClaimClientError> {
        let item = self
            .foods
            .get(food_id)
            .ok_or_else(|| ClaimClientError::UnknownListing(food_id.clone()))?;
        Ok(allocation_bounds(&item)?)
    }

    /// Submits a claim after checking it against the cached listing.
    ///
    /// The returned record carries the verification code. It is not added to
    /// the claim cache; the next `refresh_claims` picks it up.
    pub async fn create_claim(
        &self,
        food_id: &FoodId,
        quantity: u32,
        draft: ClaimDraft,
    ) -> Result<ClaimRecord, ClaimClientError> {
        let item = self
            .foods
            .get(food_id)
            .ok_or_else(|| ClaimClientError::UnknownListing(food_id.clone()))?;

        if !item.delivery_capability.supports(draft.delivery_method) {
            return Err(LedgerError::DeliveryNotSupported {
                method: draft.delivery_method,
                capability: item.delivery_capability,
            }
            .into());
        }
        allocation_bounds(&item)?.check(quantity)?;

        let request = ProcessClaimRequest {
            food_id: food_id.clone(),
            quantity_to_reduce: quantity,
            claim_data: draft,
        };
        let record = match send::<ProcessClaim, _>(&self.gateway, &request).await {
            Ok(record) => record,
            Err(e) => {
                warn!(food_id = %food_id, quantity, error = %e, "claim refused by gateway");
                return Err(e.into());
            }
        };

        let claimed = record.claimed_quantity;
        self.foods.patch_by_id(food_id, |f| {
            f.current_quantity = f.current_quantity.saturating_sub(claimed);
        });
        info!(claim_id = %record.id, food_id = %food_id, quantity = claimed, "claim created");
        Ok(record)
    }

    /// Marks a claim completed. Unscanned claims are refused without a request.
    pub async fn confirm_completion(
        &self,
        claim_id: &ClaimId,
        actor: Actor,
    ) -> Result<ClaimRecord, ClaimClientError> {
        let cached = self.cached_active(claim_id)?;
        if !cached.is_scanned {
            debug!(claim_id = %claim_id, "completion blocked locally: not scanned");
            return Err(LedgerError::NotScanned(claim_id.clone()).into());
        }

        let request = UpdateClaimStatusRequest::complete(claim_id.clone(), actor);
        self.update_status(request).await
    }

    /// Cancels an active claim.
    pub async fn cancel_claim(
        &self,
        claim_id: &ClaimId,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<ClaimRecord, ClaimClientError> {
        self.cached_active(claim_id)?;
        let request = UpdateClaimStatusRequest::cancel(claim_id.clone(), actor, reason);
        self.update_status(request).await
    }

    fn cached_active(&self, claim_id: &ClaimId) -> Result<ClaimRecord, ClaimClientError> {
        let cached = self
            .claims
            .get(claim_id)
            .ok_or_else(|| ClaimClientError::UnknownClaim(claim_id.clone()))?;
        match cached.status {
            ClaimStatus::Active => Ok(cached),
            ClaimStatus::Completed => Err(LedgerError::AlreadyCompleted(claim_id.clone()).into()),
            ClaimStatus::Cancelled => Err(LedgerError::AlreadyCancelled(claim_id.clone()).into()),
        }
    }

    async fn update_status(
        &self,
        request: UpdateClaimStatusRequest,
    ) -> Result<ClaimRecord, ClaimClientError> {
        let record = send::<UpdateClaimStatus, _>(&self.gateway, &request).await?;
        let patched = record.clone();
        if !self.claims.patch_by_id(&record.id, |c| *c = patched) {
            debug!(claim_id = %record.id, "updated claim missing from cache");
        }
        Ok(record)
    }
}
