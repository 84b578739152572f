//! # Claim Ledger Subsystem
//!
//! **Subsystem ID:** 1
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Authoritative store for food listings and the claims made against them.
//! Allocates stock, issues single-use verification codes and drives every
//! claim through its lifecycle.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `claimed + current == initial` per listing | `domain/ledger.rs` - `process_claim()` |
//! | Quantity inside allocator bounds | `domain/allocator.rs` - `check()` |
//! | Verification codes unique across all claims | `domain/ledger.rs` - `code_index` |
//! | `isScanned` only set by code verification | `ipc/handler.rs` - `handle_update_status()` |
//! | No completion before scan | `domain/lifecycle.rs` - `complete()` |
//! | Terminal states are final | `domain/lifecycle.rs` - `ensure_active()` |
//! | Cancellation never restores stock | `domain/lifecycle.rs` - `cancel()` |
//!
//! ## Claim Lifecycle
//!
//! ```text
//! [ACTIVE] ──verify code──→ [ACTIVE, scanned] ──complete──→ [COMPLETED]
//!     │                           │
//!     └──────────cancel───────────┴──────────→ [CANCELLED]
//!
//! Delivery claims, courier leg while ACTIVE:
//!   (none) ──assign──→ [PICKING_UP] ──start delivery──→ [DELIVERING]
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  ipc/handler.rs  - gateway command mapping                      │
//! │  client.rs       - cached client over a PersistenceGateway      │
//! │  service.rs      - ClaimLedgerService (mutex-guarded ledger)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - ClaimLedgerApi trait                       │
//! │  ports/outbound.rs - TimeSource, CodeGenerator traits           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/ledger.rs      - ClaimLedger                            │
//! │  domain/lifecycle.rs   - transitions and authorization          │
//! │  domain/allocator.rs   - AllocationBounds                       │
//! │  domain/persistence.rs - LedgerSnapshot                         │
//! │  domain/errors.rs      - LedgerError enum                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use client::{ClaimClient, ClaimClientError};
pub use domain::*;
pub use ipc::*;
pub use ports::*;
pub use service::ClaimLedgerService;
