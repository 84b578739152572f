//! # Domain Layer - Distribution
//!
//! - `task`: `DistributionTask` projection and its stage
//! - `worklist`: priority ordering of tasks
//! - `courier_lookup`: exact id → exact name → substring matcher chain
//! - `errors`: `DistributionError`

pub mod courier_lookup;
pub mod errors;
pub mod task;
pub mod worklist;

pub use courier_lookup::*;
pub use errors::*;
pub use task::*;
pub use worklist::*;
