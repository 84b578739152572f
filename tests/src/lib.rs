//! # Harvest Test Suite
//!
//! Cross-crate flows that no single crate can test alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs            # Ledger harness and device fakes
//! └── integration/
//!     ├── pickup_flow.rs    # claim -> scan -> complete
//!     ├── delivery_flow.rs  # courier leg
//!     ├── feedback_flow.rs  # reviews, reports, evidence
//!     └── http_transport.rs # the same over a real socket
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hv-tests
//! cargo test -p hv-tests integration::delivery_flow
//! cargo bench -p hv-tests
//! ```

pub mod support;

#[cfg(test)]
mod integration;
