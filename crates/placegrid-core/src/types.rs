//! Shared types used across placegrid crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host name → number of pending tasks whose input data is local to that host.
///
/// Ordered so that anything derived from it materializes deterministically.
pub type PendingDemand = BTreeMap<String, u32>;

/// Host name → number of additional containers desired on that host.
pub type NormalizedTarget = BTreeMap<String, u32>;

/// Placement hint attached to a single container request.
///
/// Both lists empty means "no preference": the resource manager may grant
/// the container anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityPreference {
    pub hosts: Vec<String>,
    pub racks: Vec<String>,
}

impl LocalityPreference {
    /// A record carrying no placement hint.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.hosts.is_empty() && self.racks.is_empty()
    }

    pub fn contains_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }
}

/// A container request already submitted to the resource manager but not
/// yet granted, whose host list matches current locality demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRequest {
    pub hosts: Vec<String>,
}

impl ContainerRequest {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }
}
