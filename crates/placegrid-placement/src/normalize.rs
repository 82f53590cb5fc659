//! Demand normalizer — pending task counts to per-host container targets.
//!
//! ```text
//! needed         = ceil(locality_aware_tasks * cores_per_task / cores_per_container)
//! expected[h]    = local_tasks[h] * needed / sum(local_tasks)
//! existing[h]    = granted[h] + pending_share[h]
//! target[h]      = max(0, ceil(expected[h] - existing[h]))
//! ```
//!
//! Rounding up biases toward asking for slightly too much locality: an
//! unused hint costs nothing, a missing one costs a remote read.

use std::collections::BTreeMap;

use tracing::debug;

use placegrid_core::{ContainerRequest, NormalizedTarget, PendingDemand};

use crate::error::{PlacementError, PlacementResult};
use crate::state::AllocationState;

/// Containers needed to run `tasks` tasks of `cores_per_task` cores each.
pub fn containers_needed(
    tasks: u32,
    cores_per_task: u32,
    cores_per_container: u32,
) -> PlacementResult<u32> {
    if cores_per_container == 0 {
        return Err(PlacementError::InvalidInput(
            "cores per container must be positive".to_string(),
        ));
    }
    let cores = u64::from(tasks) * u64::from(cores_per_task);
    let needed = cores.div_ceil(u64::from(cores_per_container));
    Ok(needed.min(u64::from(u32::MAX)) as u32)
}

/// Spread outstanding container requests over the hosts they name.
///
/// A request naming several hosts will be satisfied on at most one of them,
/// so each host is credited with its fraction of the request total.
pub fn pending_share(pending: &[ContainerRequest]) -> BTreeMap<String, f64> {
    let mut hits: BTreeMap<String, u32> = BTreeMap::new();
    for request in pending {
        for host in &request.hosts {
            *hits.entry(host.clone()).or_insert(0) += 1;
        }
    }

    let possible: u32 = hits.values().sum();
    if possible == 0 {
        return BTreeMap::new();
    }

    let requests = pending.len() as f64;
    hits.into_iter()
        .map(|(host, n)| (host, f64::from(n) * requests / f64::from(possible)))
        .collect()
}

/// Compute the number of additional containers wanted on each host.
///
/// Returns an empty target when there is no local demand at all.
pub fn normalize<S: AllocationState + ?Sized>(
    demand: &PendingDemand,
    locality_aware_tasks: u32,
    cores_per_task: u32,
    state: &S,
    pending: &[ContainerRequest],
) -> PlacementResult<NormalizedTarget> {
    let needed = containers_needed(locality_aware_tasks, cores_per_task, state.cores_per_container())?;

    let total_local_tasks: u64 = demand.values().map(|&c| u64::from(c)).sum();
    if total_local_tasks == 0 {
        return Ok(NormalizedTarget::new());
    }

    let pending = pending_share(pending);

    let target = demand
        .iter()
        .map(|(host, &count)| {
            let expected = f64::from(count) * f64::from(needed) / total_local_tasks as f64;
            let existing = f64::from(state.containers_on(host))
                + pending.get(host).copied().unwrap_or(0.0);
            let wanted = (expected - existing).ceil().max(0.0) as u32;

            debug!(host = %host, expected, existing, target = wanted, "normalized host demand");
            (host.clone(), wanted)
        })
        .collect();

    Ok(target)
}
