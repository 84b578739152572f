//! # Pickup Verification Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Runs the provider side of the handover check: read the receiver's code
//! from the camera (or the keyboard), submit it once to `VERIFY_ORDER_QR`
//! and report the server's verdict.
//!
//! ## Guarantees
//!
//! | Guarantee | Enforcement Location |
//! |-----------|---------------------|
//! | Camera released on every exit path | `scanner.rs` - `TrackGuard`, `ScanHandle::cancel()` |
//! | Camera failure degrades to manual entry | `session.rs` - `open()` |
//! | `is_scanned` cached only after server success | `session.rs` - `submit_code()` |
//! | Refusals reported distinctly | `domain/outcome.rs` - `VerificationOutcome` |
//!
//! Single use is enforced by the ledger, not here: resubmitting a code is
//! always safe.

pub mod domain;
pub mod ports;
pub mod scanner;
pub mod session;

pub use domain::*;
pub use ports::*;
pub use scanner::{spawn_scan_loop, ScanHandle};
pub use session::{VerificationSession, Verifier};
