//! # Typed Gateway Commands
//!
//! The gateway transport is one generic `(action, data)` endpoint. Each action
//! still gets its own request/response pair here so both ends are checked by
//! the compiler.
//!
//! | Action                | Request                  | Response              |
//! |-----------------------|--------------------------|-----------------------|
//! | `PROCESS_CLAIM`       | `ProcessClaimRequest`    | `ClaimRecord`         |
//! | `UPDATE_CLAIM_STATUS` | `UpdateClaimStatusRequest` | `ClaimRecord`       |
//! | `VERIFY_ORDER_QR`     | `VerifyOrderRequest`     | `VerifyOrderResponse` |
//! | `SUBMIT_REVIEW`       | `SubmitReviewRequest`    | `ClaimRecord`         |
//! | `SUBMIT_REPORT`       | `SubmitReportRequest`    | `ClaimRecord`         |
//! | `GET_CLAIMS`          | `ClaimFilter`            | `Vec<ClaimRecord>`    |
//! | `GET_INVENTORY`       | `InventoryFilter`        | `Vec<FoodItem>`       |
//! | `ADD_FOOD_ITEM`       | `NewFoodItem`            | `FoodItem`            |

use crate::entities::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One gateway action with its typed payloads.
pub trait GatewayCommand {
    /// Wire action name.
    const ACTION: &'static str;
    type Request: Serialize + DeserializeOwned + Send + Sync;
    type Response: Serialize + DeserializeOwned + Send;
}

macro_rules! command {
    ($name:ident, $action:literal, $req:ty => $resp:ty) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl GatewayCommand for $name {
            const ACTION: &'static str = $action;
            type Request = $req;
            type Response = $resp;
        }
    };
}

command!(ProcessClaim, "PROCESS_CLAIM", ProcessClaimRequest => ClaimRecord);
command!(UpdateClaimStatus, "UPDATE_CLAIM_STATUS", UpdateClaimStatusRequest => ClaimRecord);
command!(VerifyOrderQr, "VERIFY_ORDER_QR", VerifyOrderRequest => VerifyOrderResponse);
command!(SubmitReview, "SUBMIT_REVIEW", SubmitReviewRequest => ClaimRecord);
command!(SubmitReport, "SUBMIT_REPORT", SubmitReportRequest => ClaimRecord);
command!(GetClaims, "GET_CLAIMS", ClaimFilter => Vec<ClaimRecord>);
command!(GetInventory, "GET_INVENTORY", InventoryFilter => Vec<FoodItem>);
command!(AddFoodItem, "ADD_FOOD_ITEM", NewFoodItem => FoodItem);

/// Every action name the gateway routes.
pub const ALL_ACTIONS: [&str; 8] = [
    ProcessClaim::ACTION,
    UpdateClaimStatus::ACTION,
    VerifyOrderQr::ACTION,
    SubmitReview::ACTION,
    SubmitReport::ACTION,
    GetClaims::ACTION,
    GetInventory::ACTION,
    AddFoodItem::ACTION,
];

// =============================================================================
// PROCESS_CLAIM
// =============================================================================

/// Receiver-side details of a new claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDraft {
    pub receiver_id: ReceiverId,
    pub receiver_name: String,
    pub delivery_method: DeliveryMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessClaimRequest {
    pub food_id: FoodId,
    pub quantity_to_reduce: u32,
    pub claim_data: ClaimDraft,
}

// =============================================================================
// UPDATE_CLAIM_STATUS
// =============================================================================

/// Side fields of a status update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusExtras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<CourierId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_status: Option<CourierStatus>,
    /// Always rejected. The scan flag is owned by `VERIFY_ORDER_QR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_scanned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClaimStatusRequest {
    pub id: ClaimId,
    pub status: ClaimStatus,
    #[serde(default)]
    pub additional_data: StatusExtras,
}

impl UpdateClaimStatusRequest {
    /// `active → completed`.
    pub fn complete(id: ClaimId, actor: Actor) -> Self {
        Self {
            id,
            status: ClaimStatus::Completed,
            additional_data: StatusExtras {
                actor: Some(actor),
                ..Default::default()
            },
        }
    }

    /// `active → cancelled`.
    pub fn cancel(id: ClaimId, actor: Actor, reason: Option<String>) -> Self {
        Self {
            id,
            status: ClaimStatus::Cancelled,
            additional_data: StatusExtras {
                actor: Some(actor),
                cancel_reason: reason,
                ..Default::default()
            },
        }
    }

    /// Courier leg `unassigned → picking_up`.
    pub fn assign_courier(id: ClaimId, actor: Actor, courier_id: CourierId, courier_name: String) -> Self {
        Self {
            id,
            status: ClaimStatus::Active,
            additional_data: StatusExtras {
                actor: Some(actor),
                courier_id: Some(courier_id),
                courier_name: Some(courier_name),
                courier_status: Some(CourierStatus::PickingUp),
                ..Default::default()
            },
        }
    }

    /// Courier leg `picking_up → delivering`.
    pub fn start_delivery(id: ClaimId, actor: Actor) -> Self {
        Self {
            id,
            status: ClaimStatus::Active,
            additional_data: StatusExtras {
                actor: Some(actor),
                courier_status: Some(CourierStatus::Delivering),
                ..Default::default()
            },
        }
    }
}

// =============================================================================
// VERIFY_ORDER_QR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOrderRequest {
    pub unique_code: String,
    pub scanned_by_provider_id: ProviderId,
    pub scanned_by_provider_name: String,
}

/// Why a code was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerifyFailure {
    AlreadyScanned,
    WrongOwner,
    NotFound,
}

/// `{success: true, foodName, claimId}` or `{success: false, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOrderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<ClaimId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<VerifyFailure>,
}

impl VerifyOrderResponse {
    pub fn accepted(food_name: String, claim_id: ClaimId) -> Self {
        Self {
            success: true,
            food_name: Some(food_name),
            claim_id: Some(claim_id),
            message: None,
        }
    }

    pub fn refused(reason: VerifyFailure) -> Self {
        Self {
            success: false,
            food_name: None,
            claim_id: None,
            message: Some(reason),
        }
    }
}

// =============================================================================
// FEEDBACK
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub claim_id: ClaimId,
    pub receiver_id: ReceiverId,
    pub rating: u8,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub review_media: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportRequest {
    pub claim_id: ClaimId,
    pub reporter: Actor,
    pub reason: ReportReason,
    #[serde(default)]
    pub description: String,
    /// Encoded with [`crate::encode_evidence`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

// =============================================================================
// READ-BACK
// =============================================================================

/// `GET_CLAIMS` filter. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<ReceiverId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<CourierId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClaimStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<DeliveryMethod>,
}

impl ClaimFilter {
    pub fn for_receiver(id: ReceiverId) -> Self {
        Self {
            receiver_id: Some(id),
            ..Default::default()
        }
    }

    pub fn for_provider(id: ProviderId) -> Self {
        Self {
            provider_id: Some(id),
            ..Default::default()
        }
    }

    pub fn deliveries() -> Self {
        Self {
            delivery_method: Some(DeliveryMethod::Delivery),
            ..Default::default()
        }
    }

    pub fn matches(&self, record: &ClaimRecord) -> bool {
        self.receiver_id.as_ref().map_or(true, |id| *id == record.receiver_id)
            && self.provider_id.as_ref().map_or(true, |id| *id == record.provider_id)
            && self
                .courier_id
                .as_ref()
                .map_or(true, |id| record.courier_id.as_ref() == Some(id))
            && self.status.map_or(true, |s| s == record.status)
            && self.delivery_method.map_or(true, |m| m == record.delivery_method)
    }
}

/// `GET_INVENTORY` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
    #[serde(default)]
    pub available_only: bool,
}

impl InventoryFilter {
    pub fn matches(&self, item: &FoodItem) -> bool {
        self.provider_id.as_ref().map_or(true, |id| *id == item.provider_id)
            && (!self.available_only || item.is_available())
    }
}

// =============================================================================
// ADD_FOOD_ITEM
// =============================================================================

/// A listing as submitted by a provider. The server assigns the id and sets
/// `currentQuantity = initialQuantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodItem {
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub name: String,
    pub initial_quantity: u32,
    pub min_quantity: u32,
    pub max_quantity: u32,
    #[serde(default)]
    pub window: DistributionWindow,
    pub delivery_capability: DeliveryCapability,
}

impl NewFoodItem {
    pub fn into_item(self, id: FoodId) -> FoodItem {
        FoodItem {
            id,
            provider_id: self.provider_id,
            provider_name: self.provider_name,
            name: self.name,
            initial_quantity: self.initial_quantity,
            current_quantity: self.initial_quantity,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
            window: self.window,
            delivery_capability: self.delivery_capability,
        }
    }
}
