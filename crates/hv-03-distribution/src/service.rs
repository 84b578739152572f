//! # Distribution Service
//!
//! Courier/admin client over the persistence gateway. Holds the delivery
//! claim cache; every change to it comes from a gateway response.
//!
//! | Operation | Local guard | Gateway call |
//! |-----------|-------------|--------------|
//! | `refresh` | - | `GET_CLAIMS {deliveryMethod: delivery}` |
//! | `assign` | delivery, active, no courier | `UPDATE_CLAIM_STATUS` picking_up |
//! | `start_delivery` | courier assigned, scanned | `UPDATE_CLAIM_STATUS` delivering |
//! | `complete_delivery` | delivering | `UPDATE_CLAIM_STATUS` completed |

use crate::domain::{build_worklist, CourierLookup, DistributionError, DistributionTask};
use crate::ports::{CourierContact, DirectoryLookup};
use shared_types::{
    send, Actor, ClaimFilter, ClaimId, ClaimRecord, ClaimStatus, CourierStatus, DeliveryMethod,
    EntityCache, GetClaims, PersistenceGateway, UpdateClaimStatus, UpdateClaimStatusRequest,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct DistributionService<G: PersistenceGateway> {
    gateway: G,
    claims: Arc<EntityCache<ClaimRecord>>,
    directory: Arc<dyn DirectoryLookup>,
    lookup: CourierLookup,
}

impl<G: PersistenceGateway> DistributionService<G> {
    pub fn new(gateway: G, directory: Arc<dyn DirectoryLookup>) -> Self {
        Self {
            gateway,
            claims: Arc::default(),
            directory,
            lookup: CourierLookup::standard(),
        }
    }

    pub fn claims(&self) -> &Arc<EntityCache<ClaimRecord>> {
        &self.claims
    }

    /// Re-fetches every delivery claim, replacing the cache.
    pub async fn refresh(&self) -> Result<usize, DistributionError> {
        let records = send::<GetClaims, _>(&self.gateway, &ClaimFilter::deliveries()).await?;
        let count = records.len();
        self.claims.replace_all(records);
        debug!(count, "delivery claims refreshed");
        Ok(count)
    }

    /// Prioritized worklist from the cache.
    pub fn worklist(&self) -> Vec<DistributionTask> {
        build_worklist(&self.claims.snapshot(), self.directory.as_ref(), &self.lookup)
    }

    /// Directory entry of the courier assigned to `claim_id`.
    pub fn courier_contact(&self, claim_id: &ClaimId) -> Option<CourierContact> {
        let record = self.claims.get(claim_id)?;
        let roster = self.directory.couriers();
        self.lookup
            .resolve(record.courier_id.as_ref(), record.courier_name.as_deref(), &roster)
            .cloned()
    }

    /// Takes an unassigned delivery claim for `courier`.
    pub async fn assign(
        &self,
        claim_id: &ClaimId,
        actor: Actor,
        courier: &CourierContact,
    ) -> Result<ClaimRecord, DistributionError> {
        let record = self.cached_delivery(claim_id)?;
        if let Some(courier_id) = record.courier_id {
            return Err(DistributionError::AlreadyAssigned {
                claim_id: claim_id.clone(),
                courier_id,
            });
        }

        let request = UpdateClaimStatusRequest::assign_courier(
            claim_id.clone(),
            actor,
            courier.id.clone(),
            courier.name.clone(),
        );
        let updated = self.update(request).await?;
        info!(claim_id = %claim_id, courier_id = %courier.id, "courier assigned");
        Ok(updated)
    }

    /// Moves the courier leg to `delivering` after the provider's scan.
    pub async fn start_delivery(
        &self,
        claim_id: &ClaimId,
        actor: Actor,
    ) -> Result<ClaimRecord, DistributionError> {
        let record = self.cached_delivery(claim_id)?;
        if record.courier_status != Some(CourierStatus::PickingUp) {
            return Err(DistributionError::NoCourier(claim_id.clone()));
        }
        if !record.is_scanned {
            return Err(DistributionError::NotScanned(claim_id.clone()));
        }
        self.update(UpdateClaimStatusRequest::start_delivery(claim_id.clone(), actor))
            .await
    }

    /// Confirms drop-off.
    pub async fn complete_delivery(
        &self,
        claim_id: &ClaimId,
        actor: Actor,
    ) -> Result<ClaimRecord, DistributionError> {
        let record = self.cached_delivery(claim_id)?;
        if record.courier_status != Some(CourierStatus::Delivering) {
            return Err(DistributionError::NotDelivering(claim_id.clone()));
        }
        let updated = self
            .update(UpdateClaimStatusRequest::complete(claim_id.clone(), actor))
            .await?;
        info!(claim_id = %claim_id, "delivery completed");
        Ok(updated)
    }

    fn cached_delivery(&self, claim_id: &ClaimId) -> Result<ClaimRecord, DistributionError> {
        let record = self
            .claims
            .get(claim_id)
            .ok_or_else(|| DistributionError::UnknownClaim(claim_id.clone()))?;
        if record.delivery_method != DeliveryMethod::Delivery {
            return Err(DistributionError::NotADelivery(claim_id.clone()));
        }
        if record.status != ClaimStatus::Active {
            return Err(DistributionError::NotActive(claim_id.clone(), record.status));
        }
        Ok(record)
    }

    async fn update(
        &self,
        request: UpdateClaimStatusRequest,
    ) -> Result<ClaimRecord, DistributionError> {
        let record = send::<UpdateClaimStatus, _>(&self.gateway, &request).await?;
        let patched = record.clone();
        self.claims.patch_by_id(&record.id, |c| *c = patched);
        Ok(record)
    }
}
