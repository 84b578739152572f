//! # Ledger Snapshot
//!
//! The whole ledger serializes to one versioned JSON document so a restarted
//! gateway resumes with the same stock, claims and consumed codes.
//!
//! ## Restore checks
//!
//! 1. `version` must be [`SNAPSHOT_VERSION`]
//! 2. every listing passes `FoodItem::validate`, ids unique
//! 3. every claim references a known listing, ids and codes unique
//! 4. per listing: `claimed + current == initial`

use super::entities::{Claim, LedgerConfig};
use super::ledger::ClaimLedger;
use serde::{Deserialize, Serialize};
use shared_types::{FoodId, FoodItem};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized ledger contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub foods: Vec<FoodItem>,
    pub claims: Vec<Claim>,
}

/// Snapshot load/save failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Inconsistent snapshot: {0}")]
    Inconsistent(String),
}

impl ClaimLedger {
    /// Copies the ledger into a snapshot.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            foods: self.foods().to_vec(),
            claims: self.all_claims().to_vec(),
        }
    }

    /// Rebuilds a ledger from a snapshot after checking its invariants.
    pub fn restore(config: LedgerConfig, snapshot: LedgerSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut food_ids = HashSet::new();
        for food in &snapshot.foods {
            food.validate()
                .map_err(|e| SnapshotError::Inconsistent(format!("listing {}: {e}", food.id)))?;
            if !food_ids.insert(food.id.clone()) {
                return Err(SnapshotError::Inconsistent(format!(
                    "duplicate listing {}",
                    food.id
                )));
            }
        }

        let mut claim_ids = HashSet::new();
        let mut codes = HashSet::new();
        let mut claimed: HashMap<&FoodId, u32> = HashMap::new();
        for claim in &snapshot.claims {
            if !food_ids.contains(&claim.food_id) {
                return Err(SnapshotError::Inconsistent(format!(
                    "claim {} references unknown listing {}",
                    claim.id, claim.food_id
                )));
            }
            if !claim_ids.insert(claim.id.clone()) {
                return Err(SnapshotError::Inconsistent(format!("duplicate claim {}", claim.id)));
            }
            if !codes.insert(claim.code.as_str()) {
                return Err(SnapshotError::Inconsistent(format!(
                    "claim {} reuses a verification code",
                    claim.id
                )));
            }
            let total = claimed.entry(&claim.food_id).or_default();
            *total = total.checked_add(claim.quantity).ok_or_else(|| {
                SnapshotError::Inconsistent(format!(
                    "claimed quantity for listing {} overflows",
                    claim.food_id
                ))
            })?;
        }

        for food in &snapshot.foods {
            let total = claimed.get(&food.id).copied().unwrap_or(0);
            if total.checked_add(food.current_quantity) != Some(food.initial_quantity) {
                return Err(SnapshotError::Inconsistent(format!(
                    "listing {}: claimed {total} + remaining {} != initial {}",
                    food.id, food.current_quantity, food.initial_quantity
                )));
            }
        }

        Ok(ClaimLedger::from_parts(config, snapshot.foods, snapshot.claims))
    }
}

/// Reads a snapshot. A missing file is not an error and yields `None`.
pub fn load_snapshot(path: &Path) -> Result<Option<LedgerSnapshot>, SnapshotError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes a snapshot through a synced temporary file and a rename.
pub fn save_snapshot(path: &Path, snapshot: &LedgerSnapshot) -> Result<(), SnapshotError> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    let mut file = std::fs::File::create(&tmp)?;
    file.write_all(&json)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(&tmp, path)?;
    Ok(())
}
