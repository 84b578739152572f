//! # Shared Types Crate
//!
//! This crate contains the wire entities, the gateway envelope and the typed
//! command set that every Harvest component speaks.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every type that crosses the Persistence
//!   Gateway is defined here.
//! - **Envelope Integrity**: `GatewayRequest` / `GatewayResponse` are the sole
//!   wrappers for gateway traffic. The response envelope carries its own
//!   `status` field independent of HTTP status.
//! - **Typed Commands over a Generic Endpoint**: each gateway action is a
//!   `GatewayCommand` with its own request/response pair, even though the
//!   transport is one `(action, data)` endpoint.
//! - **Backend-Owned Records**: clients only hold cached copies in an
//!   `EntityCache`, reconciled from gateway responses.

pub mod cache;
pub mod commands;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod evidence;
pub mod gateway;

pub use cache::{EntityCache, Keyed};
pub use commands::*;
pub use entities::*;
pub use envelope::{GatewayRequest, GatewayResponse, ResponseStatus};
pub use errors::*;
pub use evidence::{decode_evidence, encode_evidence};
pub use gateway::{parse_envelope, send, PersistenceGateway};
