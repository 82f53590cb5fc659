//! Host → rack resolution.
//!
//! The allocator only needs a single lookup; everything about where the
//! topology comes from stays behind [`RackResolver`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use placegrid_core::config::{DEFAULT_RACK, TopologyConfig};

/// Maps a host name to the name of the rack it lives in.
///
/// Must succeed for every host; unknown hosts map to a default rack.
pub trait RackResolver {
    fn resolve(&self, host: &str) -> String;
}

impl<R: RackResolver + ?Sized> RackResolver for &R {
    fn resolve(&self, host: &str) -> String {
        (**self).resolve(host)
    }
}

impl<R: RackResolver + ?Sized> RackResolver for Box<R> {
    fn resolve(&self, host: &str) -> String {
        (**self).resolve(host)
    }
}

impl<R: RackResolver + ?Sized> RackResolver for Arc<R> {
    fn resolve(&self, host: &str) -> String {
        (**self).resolve(host)
    }
}

/// Table-driven resolver, typically built from the `[topology]` section.
#[derive(Debug, Clone)]
pub struct StaticRackResolver {
    racks: HashMap<String, String>,
    default_rack: String,
}

impl StaticRackResolver {
    pub fn new(default_rack: impl Into<String>) -> Self {
        Self {
            racks: HashMap::new(),
            default_rack: default_rack.into(),
        }
    }

    /// Builder-style rack assignment for a single host.
    pub fn with_rack(mut self, host: impl Into<String>, rack: impl Into<String>) -> Self {
        self.racks.insert(host.into(), rack.into());
        self
    }

    pub fn from_topology(topology: &TopologyConfig) -> Self {
        Self {
            racks: topology
                .racks
                .iter()
                .map(|(h, r)| (h.clone(), r.clone()))
                .collect(),
            default_rack: topology.default_rack.clone(),
        }
    }

    pub fn default_rack(&self) -> &str {
        &self.default_rack
    }
}

impl Default for StaticRackResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RACK)
    }
}

impl RackResolver for StaticRackResolver {
    fn resolve(&self, host: &str) -> String {
        self.racks
            .get(host)
            .cloned()
            .unwrap_or_else(|| self.default_rack.clone())
    }
}

/// Memoizing wrapper for resolvers backed by a slow lookup (topology
/// scripts, DNS, a remote service).
pub struct CachingRackResolver<R> {
    inner: R,
    cache: Mutex<HashMap<String, String>>,
}

impl<R: RackResolver> CachingRackResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct hosts resolved so far.
    pub fn cached_hosts(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: RackResolver> RackResolver for CachingRackResolver<R> {
    fn resolve(&self, host: &str) -> String {
        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(rack) = cache.get(host) {
                return rack.clone();
            }
        }

        // Resolve outside the lock; a concurrent miss just resolves twice.
        let rack = self.inner.resolve(host);
        trace!(host, rack = %rack, "resolved rack");

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(host.to_string(), rack.clone());
        rack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::BTreeMap;

    struct CountingResolver {
        calls: Cell<u32>,
    }

    impl RackResolver for CountingResolver {
        fn resolve(&self, host: &str) -> String {
            self.calls.set(self.calls.get() + 1);
            format!("/rack-of-{host}")
        }
    }

    #[test]
    fn static_resolver_uses_table() {
        let resolver = StaticRackResolver::default()
            .with_rack("host1", "/rack-a")
            .with_rack("host2", "/rack-b");

        assert_eq!(resolver.resolve("host1"), "/rack-a");
        assert_eq!(resolver.resolve("host2"), "/rack-b");
    }

    #[test]
    fn static_resolver_falls_back_to_default_rack() {
        let resolver = StaticRackResolver::default();
        assert_eq!(resolver.resolve("unknown"), DEFAULT_RACK);

        let custom = StaticRackResolver::new("/elsewhere");
        assert_eq!(custom.resolve("unknown"), "/elsewhere");
        assert_eq!(custom.default_rack(), "/elsewhere");
    }

    #[test]
    fn static_resolver_from_topology() {
        let mut racks = BTreeMap::new();
        racks.insert("host1".to_string(), "/rack-a".to_string());
        let topology = TopologyConfig {
            default_rack: "/fallback".to_string(),
            racks,
        };

        let resolver = StaticRackResolver::from_topology(&topology);
        assert_eq!(resolver.resolve("host1"), "/rack-a");
        assert_eq!(resolver.resolve("host9"), "/fallback");
    }

    #[test]
    fn caching_resolver_hits_inner_once_per_host() {
        let resolver = CachingRackResolver::new(CountingResolver { calls: Cell::new(0) });

        assert_eq!(resolver.resolve("h1"), "/rack-of-h1");
        assert_eq!(resolver.resolve("h1"), "/rack-of-h1");
        assert_eq!(resolver.resolve("h2"), "/rack-of-h2");

        assert_eq!(resolver.inner().calls.get(), 2);
        assert_eq!(resolver.cached_hosts(), 2);
    }

    #[test]
    fn resolver_works_through_references_and_boxes() {
        let resolver = StaticRackResolver::default().with_rack("h", "/r");
        let boxed: Box<dyn RackResolver> = Box::new(resolver.clone());
        let shared = Arc::new(resolver.clone());

        fn lookup<R: RackResolver>(resolver: R, host: &str) -> String {
            resolver.resolve(host)
        }

        assert_eq!(lookup(&resolver, "h"), "/r");
        assert_eq!(lookup(boxed, "h"), "/r");
        assert_eq!(lookup(shared, "h"), "/r");
    }
}
