//! Domain layer for feedback.

pub mod drafts;
pub mod errors;

pub use drafts::*;
pub use errors::*;
