//! # Domain Layer - Claim Ledger
//!
//! Pure business logic for listings, claims and their lifecycle.
//!
//! ## Components
//!
//! - `allocator`: claimable quantity bounds for a listing
//! - `entities`: `Claim`, `ClaimState`, courier leg, review, report
//! - `lifecycle`: status transitions and who may trigger them
//! - `ledger`: `ClaimLedger`, the authoritative store
//! - `persistence`: versioned JSON snapshot
//! - `codes`: verification code normalization and log fingerprints
//! - `value_objects`: `ScanOutcome`, `LedgerStatus`
//! - `errors`: `LedgerError`

pub mod allocator;
pub mod codes;
pub mod entities;
pub mod errors;
pub mod ledger;
pub mod lifecycle;
pub mod persistence;
pub mod value_objects;

pub use allocator::*;
pub use codes::*;
pub use entities::*;
pub use errors::*;
pub use ledger::*;
pub use persistence::*;
pub use value_objects::*;
