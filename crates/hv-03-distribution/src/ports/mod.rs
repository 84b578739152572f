//! Ports layer for distribution.

pub mod outbound;

pub use outbound::*;
