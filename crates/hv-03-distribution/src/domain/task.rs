//! Delivery task projection.
//!
//! A `DistributionTask` owns no state: it is rebuilt from a delivery
//! `ClaimRecord` plus directory data on every refresh.

use crate::domain::courier_lookup::CourierLookup;
use crate::ports::{CourierContact, DirectoryLookup};
use serde::{Deserialize, Serialize};
use shared_types::{
    ClaimId, ClaimRecord, ClaimStatus, CourierStatus, DeliveryMethod, FoodId, Timestamp,
};

/// Where a delivery stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStage {
    Unassigned,
    PickingUp,
    Delivering,
    Completed,
}

impl TaskStage {
    /// Stage of a delivery claim. Cancelled claims have none.
    pub fn of(record: &ClaimRecord) -> Option<Self> {
        match record.status {
            ClaimStatus::Cancelled => None,
            ClaimStatus::Completed => Some(Self::Completed),
            ClaimStatus::Active => Some(match record.courier_status {
                None => Self::Unassigned,
                Some(CourierStatus::PickingUp) => Self::PickingUp,
                Some(CourierStatus::Delivering) => Self::Delivering,
            }),
        }
    }

    /// Sort key: unassigned first, in progress next, completed last.
    pub fn priority(self) -> u8 {
        match self {
            Self::Unassigned => 0,
            Self::PickingUp | Self::Delivering => 1,
            Self::Completed => 2,
        }
    }
}

/// One row of the courier/admin worklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionTask {
    pub claim_id: ClaimId,
    pub food_id: FoodId,
    pub food_name: String,
    pub quantity: u32,
    pub stage: TaskStage,
    pub is_scanned: bool,
    pub provider_name: String,
    pub pickup_address: Option<String>,
    pub receiver_name: String,
    pub dropoff_address: Option<String>,
    /// Directory entry for the assigned courier, when one resolves.
    pub courier: Option<CourierContact>,
    /// Name stored on the claim, shown when the directory has no match.
    pub courier_name: Option<String>,
    pub created_at: Timestamp,
}

impl DistributionTask {
    /// Projects a claim. `None` for pickup claims and cancelled claims.
    pub fn project(
        record: &ClaimRecord,
        directory: &dyn DirectoryLookup,
        couriers: &CourierLookup,
        roster: &[CourierContact],
    ) -> Option<Self> {
        if record.delivery_method != DeliveryMethod::Delivery {
            return None;
        }
        let stage = TaskStage::of(record)?;

        let courier = if record.has_courier() || record.courier_name.is_some() {
            couriers
                .resolve(
                    record.courier_id.as_ref(),
                    record.courier_name.as_deref(),
                    roster,
                )
                .cloned()
        } else {
            None
        };

        Some(Self {
            claim_id: record.id.clone(),
            food_id: record.food_id.clone(),
            food_name: record.food_name.clone(),
            quantity: record.claimed_quantity,
            stage,
            is_scanned: record.is_scanned,
            provider_name: record.provider_name.clone(),
            pickup_address: directory.provider_address(&record.provider_id),
            receiver_name: record.receiver_name.clone(),
            dropoff_address: directory.receiver_address(&record.receiver_id),
            courier,
            courier_name: record.courier_name.clone(),
            created_at: record.created_at,
        })
    }
}
