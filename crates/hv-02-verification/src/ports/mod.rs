//! Ports layer for pickup verification.
//!
//! - `outbound`: camera device, media stream and barcode decoder
//!
//! The inbound side is [`crate::VerificationSession`] itself; the persistence
//! gateway port comes from `shared-types`.

pub mod outbound;

pub use outbound::*;
