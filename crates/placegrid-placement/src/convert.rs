//! Type conversions between scenario config types and placement types.
//!
//! Bridges `placegrid_core::PlacegridConfig` (signed counts, as written in
//! the file) to the unsigned inputs of [`ContainerPlacementStrategy`],
//! rejecting negative or out-of-range values.

use std::collections::BTreeMap;

use placegrid_core::config::{PlacegridConfig, RequestConfig};
use placegrid_core::{ContainerRequest, PendingDemand};

use crate::error::{PlacementError, PlacementResult};
use crate::rack::StaticRackResolver;
use crate::state::AllocationSnapshot;
use crate::strategy::ContainerPlacementStrategy;

/// A fully validated placement request read from a scenario file.
#[derive(Debug, Clone)]
pub struct PlacementInputs {
    pub num_containers: u32,
    pub locality_aware_tasks: u32,
    pub local_tasks: PendingDemand,
    pub allocation: AllocationSnapshot,
    pub pending: Vec<ContainerRequest>,
}

/// Convert a signed count from config into `u32`.
pub fn to_count(field: &str, value: i64) -> PlacementResult<u32> {
    u32::try_from(value).map_err(|_| {
        PlacementError::InvalidInput(format!("{field} must be between 0 and {}, got {value}", u32::MAX))
    })
}

fn to_counts(field: &str, map: &BTreeMap<String, i64>) -> PlacementResult<BTreeMap<String, u32>> {
    map.iter()
        .map(|(host, &v)| Ok((host.clone(), to_count(&format!("{field}.{host}"), v)?)))
        .collect()
}

/// Build the strategy described by `[allocator]` and `[topology]`.
pub fn config_to_strategy(
    config: &PlacegridConfig,
) -> PlacementResult<ContainerPlacementStrategy<StaticRackResolver>> {
    let cores_per_task = to_count("allocator.cores_per_task", config.allocator.cores_per_task)?;
    ContainerPlacementStrategy::new(StaticRackResolver::from_topology(&config.topology), cores_per_task)
}

/// Extract and validate the request, allocation, and pending sections.
pub fn config_to_inputs(config: &PlacegridConfig) -> PlacementResult<PlacementInputs> {
    let request: &RequestConfig = config
        .request
        .as_ref()
        .ok_or_else(|| PlacementError::InvalidInput("missing [request] section".to_string()))?;

    let cores_per_container = to_count(
        "allocator.cores_per_container",
        config.allocator.cores_per_container,
    )?;

    let mut allocation = AllocationSnapshot::new(cores_per_container);
    for (host, count) in to_counts("allocated", &config.allocated)? {
        allocation.set_containers(host, count);
    }

    Ok(PlacementInputs {
        num_containers: to_count("request.num_containers", request.num_containers)?,
        locality_aware_tasks: to_count("request.locality_aware_tasks", request.locality_aware_tasks)?,
        local_tasks: to_counts("request.local_tasks", &request.local_tasks)?,
        allocation,
        pending: config
            .pending
            .iter()
            .map(|p| ContainerRequest::new(p.hosts.iter().cloned()))
            .collect(),
    })
}
