//! Gateway-facing layer of the Claim Ledger.
//!
//! Request and response payloads live in `shared-types::commands`; this
//! module only maps them onto the ledger API.

pub mod handler;

pub use handler::LedgerHandler;
