//! Read-only view of containers the resource manager has already granted.

use std::collections::BTreeMap;

/// Point-in-time allocation state queried by the demand normalizer.
///
/// Implementations must answer all queries of one placement call from the
/// same snapshot; stale data only degrades placement quality.
pub trait AllocationState {
    /// Containers currently granted on `host`; 0 for unknown hosts.
    fn containers_on(&self, host: &str) -> u32;

    /// Cores supplied by each container.
    fn cores_per_container(&self) -> u32;
}

impl<S: AllocationState + ?Sized> AllocationState for &S {
    fn containers_on(&self, host: &str) -> u32 {
        (**self).containers_on(host)
    }

    fn cores_per_container(&self) -> u32 {
        (**self).cores_per_container()
    }
}

/// In-memory allocation snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationSnapshot {
    containers: BTreeMap<String, u32>,
    cores_per_container: u32,
}

impl AllocationSnapshot {
    pub fn new(cores_per_container: u32) -> Self {
        Self {
            containers: BTreeMap::new(),
            cores_per_container,
        }
    }

    /// Builder-style: set the granted container count for `host`.
    pub fn with_containers(mut self, host: impl Into<String>, count: u32) -> Self {
        self.set_containers(host, count);
        self
    }

    pub fn set_containers(&mut self, host: impl Into<String>, count: u32) {
        let host = host.into();
        if count == 0 {
            self.containers.remove(&host);
        } else {
            self.containers.insert(host, count);
        }
    }

    /// Record one more granted container on `host`.
    pub fn record_grant(&mut self, host: &str) {
        *self.containers.entry(host.to_string()).or_insert(0) += 1;
    }

    /// Record a released container on `host`.
    pub fn record_release(&mut self, host: &str) {
        if let Some(count) = self.containers.get_mut(host) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.containers.remove(host);
            }
        }
    }

    pub fn total_containers(&self) -> u32 {
        self.containers.values().sum()
    }
}

impl AllocationState for AllocationSnapshot {
    fn containers_on(&self, host: &str) -> u32 {
        self.containers.get(host).copied().unwrap_or(0)
    }

    fn cores_per_container(&self) -> u32 {
        self.cores_per_container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_host_has_no_containers() {
        let snapshot = AllocationSnapshot::new(4);
        assert_eq!(snapshot.containers_on("host1"), 0);
        assert_eq!(snapshot.cores_per_container(), 4);
    }

    #[test]
    fn grants_and_releases_are_tracked() {
        let mut snapshot = AllocationSnapshot::new(2).with_containers("host1", 2);
        snapshot.record_grant("host1");
        snapshot.record_grant("host2");
        assert_eq!(snapshot.containers_on("host1"), 3);
        assert_eq!(snapshot.containers_on("host2"), 1);
        assert_eq!(snapshot.total_containers(), 4);

        snapshot.record_release("host2");
        snapshot.record_release("host2");
        snapshot.record_release("host3");
        assert_eq!(snapshot.containers_on("host2"), 0);
        assert_eq!(snapshot.total_containers(), 3);
    }

    #[test]
    fn setting_zero_clears_host() {
        let mut snapshot = AllocationSnapshot::new(1).with_containers("host1", 5);
        snapshot.set_containers("host1", 0);
        assert_eq!(snapshot, AllocationSnapshot::new(1));
    }
}
