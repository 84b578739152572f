//! Worklist ordering.

use crate::domain::courier_lookup::CourierLookup;
use crate::domain::task::DistributionTask;
use crate::ports::DirectoryLookup;
use shared_types::ClaimRecord;

/// Builds the delivery worklist from claims in server order.
///
/// Pickup and cancelled claims are left out. The sort is stable, so tasks
/// of equal priority keep the order the server returned.
pub fn build_worklist(
    records: &[ClaimRecord],
    directory: &dyn DirectoryLookup,
    couriers: &CourierLookup,
) -> Vec<DistributionTask> {
    let roster = directory.couriers();
    let mut tasks: Vec<DistributionTask> = records
        .iter()
        .filter_map(|r| DistributionTask::project(r, directory, couriers, &roster))
        .collect();
    tasks.sort_by_key(|t| t.stage.priority());
    tasks
}
