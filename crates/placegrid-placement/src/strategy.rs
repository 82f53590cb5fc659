//! Locality-preferred container placement strategy.
//!
//! Entry point used by the component that submits container requests:
//! validate inputs, normalize demand against current allocations, then
//! allocate one locality preference per requested container.

use tracing::{info, warn};

use placegrid_core::{ContainerRequest, LocalityPreference, PendingDemand};

use crate::allocator::{allocate, split};
use crate::error::{PlacementError, PlacementResult};
use crate::normalize::normalize;
use crate::rack::RackResolver;
use crate::state::AllocationState;

/// Computes container locality preferences for a fixed task shape.
///
/// Stateless between calls; safe to share across threads when the
/// resolver is.
#[derive(Debug, Clone)]
pub struct ContainerPlacementStrategy<R> {
    resolver: R,
    cores_per_task: u32,
}

impl<R: RackResolver> ContainerPlacementStrategy<R> {
    pub fn new(resolver: R, cores_per_task: u32) -> PlacementResult<Self> {
        if cores_per_task == 0 {
            return Err(PlacementError::InvalidInput(
                "cores per task must be positive".to_string(),
            ));
        }
        Ok(Self {
            resolver,
            cores_per_task,
        })
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn cores_per_task(&self) -> u32 {
        self.cores_per_task
    }

    /// Locality preferences for `num_container` new containers.
    ///
    /// The result always has exactly `num_container` entries. Entries with
    /// no hosts come first; the rest list hosts in name order with racks
    /// deduplicated.
    pub fn compute_placements<S: AllocationState + ?Sized>(
        &self,
        num_container: u32,
        locality_aware_tasks: u32,
        host_to_local_task_count: &PendingDemand,
        state: &S,
        pending: &[ContainerRequest],
    ) -> PlacementResult<Vec<LocalityPreference>> {
        validate(host_to_local_task_count, state)?;

        let target = normalize(
            host_to_local_task_count,
            locality_aware_tasks,
            self.cores_per_task,
            state,
            pending,
        )?;

        let groups = split(num_container, &target);
        if groups.locality_aware == 0 && num_container > 0 && !target.is_empty() {
            warn!(
                hosts = target.len(),
                "locality demand already covered by existing containers"
            );
        }

        let preferences = allocate(num_container, &target, &self.resolver)?;

        info!(
            requested = num_container,
            locality_free = groups.locality_free,
            locality_aware = groups.locality_aware,
            "computed container locality preferences"
        );

        Ok(preferences)
    }
}

fn validate<S: AllocationState + ?Sized>(demand: &PendingDemand, state: &S) -> PlacementResult<()> {
    if state.cores_per_container() == 0 {
        return Err(PlacementError::InvalidInput(
            "cores per container must be positive".to_string(),
        ));
    }
    if demand.keys().any(|h| h.trim().is_empty()) {
        return Err(PlacementError::InvalidInput(
            "host names in locality demand must not be empty".to_string(),
        ));
    }
    Ok(())
}
