//! # Distribution Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Courier-mediated leg of delivery claims: a prioritized worklist built
//! from delivery claims, courier directory lookup, and the courier status
//! updates `picking_up → delivering → completed`.
//!
//! ## Worklist Order
//!
//! | Priority | Stage |
//! |----------|-------|
//! | 0 | unassigned |
//! | 1 | picking_up, delivering |
//! | 2 | completed |
//!
//! Cancelled and pickup claims never appear. Equal priorities keep server
//! order.
//!
//! ## Module Structure
//!
//! ```text
//! service.rs            - DistributionService (gateway client, claim cache)
//! ports/outbound.rs     - DirectoryLookup, CourierContact
//! domain/task.rs        - DistributionTask, TaskStage
//! domain/worklist.rs    - build_worklist()
//! domain/courier_lookup.rs - CourierLookup matcher chain
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::DistributionService;
