//! # Outbound Port - DirectoryLookup
//!
//! User directory joined into the worklist for display and routing. The
//! ledger only stores ids and names; addresses and phone numbers live here.

use serde::{Deserialize, Serialize};
use shared_types::{CourierId, ProviderId, ReceiverId};

/// Courier as listed in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierContact {
    pub id: CourierId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Read-only user directory.
pub trait DirectoryLookup: Send + Sync {
    fn provider_address(&self, id: &ProviderId) -> Option<String>;

    fn receiver_address(&self, id: &ReceiverId) -> Option<String>;

    /// All couriers, in directory order.
    fn couriers(&self) -> Vec<CourierContact>;
}

/// Directory with no entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDirectory;

impl DirectoryLookup for EmptyDirectory {
    fn provider_address(&self, _id: &ProviderId) -> Option<String> {
        None
    }

    fn receiver_address(&self, _id: &ReceiverId) -> Option<String> {
        None
    }

    fn couriers(&self) -> Vec<CourierContact> {
        Vec::new()
    }
}
