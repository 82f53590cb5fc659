//! Placement allocator — turns per-host container targets into one
//! locality preference per requested container.
//!
//! Resource managers only understand host *membership* in a request, not
//! weights. The allocator approximates a weighted distribution by scaling
//! each host's target onto `0..=locality_aware` and emitting a shrinking
//! host set: every record lists the hosts whose remaining ratio is still
//! positive, then every ratio drops by one. Hosts with more demand survive
//! more rounds and so appear in more requests.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use placegrid_core::{LocalityPreference, NormalizedTarget};

use crate::error::{PlacementError, PlacementResult};
use crate::rack::RackResolver;

/// How a batch of container requests divides between the two groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Containers requested without any placement hint.
    pub locality_free: u32,
    /// Containers requested with a host/rack preference.
    pub locality_aware: u32,
}

/// Divide `num_container` into locality-free and locality-aware requests.
pub fn split(num_container: u32, target: &NormalizedTarget) -> Split {
    let wanted: u64 = target.values().map(|&t| u64::from(t)).sum();
    let locality_aware = u64::from(num_container).min(wanted) as u32;
    Split {
        locality_free: num_container - locality_aware,
        locality_aware,
    }
}

/// Remaining per-host ratios at one iteration of the allocator.
///
/// Immutable: [`RatioSnapshot::step`] produces the next snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatioSnapshot {
    ratios: BTreeMap<String, u32>,
}

impl RatioSnapshot {
    /// Rescale raw targets so the largest maps to `locality_aware`.
    ///
    /// `ratio[h] = ceil(target[h] * locality_aware / max(target))`
    pub fn scaled(target: &NormalizedTarget, locality_aware: u32) -> PlacementResult<Self> {
        let max_target = target.values().copied().max().unwrap_or(0);
        if max_target == 0 {
            return Err(PlacementError::Invariant(format!(
                "{locality_aware} locality-aware containers requested but no host has a positive target"
            )));
        }

        let ratios = target
            .iter()
            .map(|(host, &t)| {
                let scaled = (u64::from(t) * u64::from(locality_aware)).div_ceil(u64::from(max_target));
                (host.clone(), scaled as u32)
            })
            .collect();

        Ok(Self { ratios })
    }

    /// Hosts that may still receive a container, in ascending name order.
    pub fn candidates(&self) -> Vec<String> {
        self.ratios
            .iter()
            .filter(|(_, r)| **r > 0)
            .map(|(h, _)| h.clone())
            .collect()
    }

    /// The snapshot after one more container has been handed out.
    pub fn step(&self) -> Self {
        Self {
            ratios: self
                .ratios
                .iter()
                .map(|(h, &r)| (h.clone(), r.saturating_sub(1)))
                .collect(),
        }
    }

    pub fn ratio(&self, host: &str) -> u32 {
        self.ratios.get(host).copied().unwrap_or(0)
    }

    pub fn is_exhausted(&self) -> bool {
        self.ratios.values().all(|&r| r == 0)
    }
}

/// Racks of `hosts`, deduplicated in first-seen order.
pub fn racks_for<R: RackResolver + ?Sized>(hosts: &[String], resolver: &R) -> Vec<String> {
    let mut seen = HashSet::new();
    hosts
        .iter()
        .map(|h| resolver.resolve(h))
        .filter(|rack| seen.insert(rack.clone()))
        .collect()
}

/// Produce exactly `num_container` locality preferences.
///
/// Locality-free records come first, followed by locality-aware records in
/// allocation order (widest host set first).
pub fn allocate<R: RackResolver + ?Sized>(
    num_container: u32,
    target: &NormalizedTarget,
    resolver: &R,
) -> PlacementResult<Vec<LocalityPreference>> {
    let Split {
        locality_free,
        locality_aware,
    } = split(num_container, target);

    let mut preferences = Vec::with_capacity(num_container as usize);
    preferences.extend((0..locality_free).map(|_| LocalityPreference::unconstrained()));

    if locality_aware > 0 {
        let mut snapshot = RatioSnapshot::scaled(target, locality_aware)?;

        for round in 0..locality_aware {
            let hosts = snapshot.candidates();
            let racks = racks_for(&hosts, resolver);
            debug!(round, hosts = ?hosts, racks = ?racks, "locality-aware container");

            preferences.push(LocalityPreference { hosts, racks });
            snapshot = snapshot.step();
        }
    }

    if preferences.len() != num_container as usize {
        return Err(PlacementError::Invariant(format!(
            "produced {} preferences for {num_container} containers",
            preferences.len()
        )));
    }

    Ok(preferences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rack::StaticRackResolver;

    fn target(entries: &[(&str, u32)]) -> NormalizedTarget {
        entries.iter().map(|(h, c)| (h.to_string(), *c)).collect()
    }

    fn resolver() -> StaticRackResolver {
        StaticRackResolver::default()
            .with_rack("host1", "/rack-a")
            .with_rack("host2", "/rack-a")
            .with_rack("host3", "/rack-b")
            .with_rack("host4", "/rack-b")
    }

    fn appearances(prefs: &[LocalityPreference], host: &str) -> usize {
        prefs.iter().filter(|p| p.contains_host(host)).count()
    }

    #[test]
    fn split_caps_aware_by_total_target() {
        let t = target(&[("host1", 5), ("host2", 5), ("host3", 4), ("host4", 2)]);
        assert_eq!(split(18, &t), Split { locality_free: 2, locality_aware: 16 });
        assert_eq!(split(10, &t), Split { locality_free: 0, locality_aware: 10 });
        assert_eq!(split(0, &t), Split { locality_free: 0, locality_aware: 0 });
    }

    #[test]
    fn split_with_empty_target_is_all_free() {
        assert_eq!(
            split(7, &NormalizedTarget::new()),
            Split { locality_free: 7, locality_aware: 0 }
        );
    }

    #[test]
    fn scaled_ratios_round_up() {
        let t = target(&[("host1", 5), ("host2", 5), ("host3", 4), ("host4", 2)]);
        let snapshot = RatioSnapshot::scaled(&t, 10).unwrap();

        assert_eq!(snapshot.ratio("host1"), 10);
        assert_eq!(snapshot.ratio("host2"), 10);
        assert_eq!(snapshot.ratio("host3"), 8);
        assert_eq!(snapshot.ratio("host4"), 4);
        assert_eq!(snapshot.ratio("missing"), 0);
    }

    #[test]
    fn scaled_rejects_all_zero_targets() {
        let t = target(&[("host1", 0)]);
        assert!(matches!(
            RatioSnapshot::scaled(&t, 3),
            Err(PlacementError::Invariant(_))
        ));
        assert!(RatioSnapshot::scaled(&NormalizedTarget::new(), 1).is_err());
    }

    #[test]
    fn step_leaves_previous_snapshot_untouched() {
        let t = target(&[("a", 2), ("b", 1)]);
        let first = RatioSnapshot::scaled(&t, 2).unwrap();
        let second = first.step();
        let third = second.step();

        assert_eq!(first.candidates(), vec!["a", "b"]);
        assert_eq!(second.candidates(), vec!["a"]);
        assert!(third.candidates().is_empty());
        assert!(third.is_exhausted());
        assert_eq!(third.step(), third);
    }

    #[test]
    fn racks_are_deduplicated_in_order() {
        let hosts: Vec<String> = ["host3", "host1", "host4", "host2", "elsewhere"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(
            racks_for(&hosts, &resolver()),
            vec!["/rack-b", "/rack-a", "/default-rack"]
        );
    }

    #[test]
    fn free_records_precede_aware_records() {
        let t = target(&[("host1", 1)]);
        let prefs = allocate(3, &t, &resolver()).unwrap();

        assert_eq!(prefs.len(), 3);
        assert!(prefs[0].is_unconstrained());
        assert!(prefs[1].is_unconstrained());
        assert_eq!(prefs[2].hosts, vec!["host1"]);
        assert_eq!(prefs[2].racks, vec!["/rack-a"]);
    }

    #[test]
    fn frequencies_follow_scaled_ratios() {
        let t = target(&[("host1", 5), ("host2", 5), ("host3", 4), ("host4", 2)]);
        let prefs = allocate(10, &t, &resolver()).unwrap();

        assert_eq!(prefs.len(), 10);
        assert_eq!(appearances(&prefs, "host1"), 10);
        assert_eq!(appearances(&prefs, "host2"), 10);
        assert_eq!(appearances(&prefs, "host3"), 8);
        assert_eq!(appearances(&prefs, "host4"), 4);

        assert_eq!(prefs[0].racks, vec!["/rack-a", "/rack-b"]);
        assert_eq!(prefs[9].hosts, vec!["host1", "host2"]);
        assert_eq!(prefs[9].racks, vec!["/rack-a"]);
    }

    #[test]
    fn zero_target_hosts_never_appear() {
        let t = target(&[("host1", 3), ("host2", 0)]);
        let prefs = allocate(3, &t, &resolver()).unwrap();

        assert_eq!(appearances(&prefs, "host1"), 3);
        assert_eq!(appearances(&prefs, "host2"), 0);
    }

    #[test]
    fn zero_containers_yields_nothing() {
        let t = target(&[("host1", 3)]);
        assert!(allocate(0, &t, &resolver()).unwrap().is_empty());
    }
}
