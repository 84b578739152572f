//! Ports layer for the Claim Ledger.
//!
//! - `inbound`: the ledger API driven by the gateway
//! - `outbound`: clock and verification code source

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
