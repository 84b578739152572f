//! Ports layer for feedback.

pub mod outbound;

pub use outbound::*;
