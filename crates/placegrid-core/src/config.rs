//! placegrid.toml scenario/configuration parser.
//!
//! Counts are kept signed here so that a malformed file (negative task
//! counts, negative allocations) parses and can be rejected with a precise
//! message by the placement crate instead of a generic TOML type error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

/// Rack assigned to hosts missing from the topology table.
pub const DEFAULT_RACK: &str = "/default-rack";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacegridConfig {
    pub allocator: AllocatorConfig,
    #[serde(default)]
    pub topology: TopologyConfig,
    pub request: Option<RequestConfig>,
    /// Host → containers already granted on that host.
    #[serde(default)]
    pub allocated: BTreeMap<String, i64>,
    /// Outstanding container requests whose hosts match current demand.
    #[serde(default)]
    pub pending: Vec<PendingRequestConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Cores granted per container (executor cores).
    pub cores_per_container: i64,
    /// Cores consumed by a single task.
    #[serde(default = "default_cores_per_task")]
    pub cores_per_task: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    #[serde(default = "default_rack")]
    pub default_rack: String,
    #[serde(default)]
    pub racks: BTreeMap<String, String>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            default_rack: default_rack(),
            racks: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    pub num_containers: i64,
    pub locality_aware_tasks: i64,
    #[serde(default)]
    pub local_tasks: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequestConfig {
    pub hosts: Vec<String>,
}

fn default_cores_per_task() -> i64 {
    1
}

fn default_rack() -> String {
    DEFAULT_RACK.to_string()
}

impl PlacegridConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Sample scenario: four hosts over two racks with skewed demand.
    pub fn scaffold() -> Self {
        let hosts = [("host1", 30), ("host2", 30), ("host3", 20), ("host4", 10)];
        let racks = [
            ("host1", "/rack-a"),
            ("host2", "/rack-a"),
            ("host3", "/rack-b"),
            ("host4", "/rack-b"),
        ];

        PlacegridConfig {
            allocator: AllocatorConfig {
                cores_per_container: 4,
                cores_per_task: 1,
            },
            topology: TopologyConfig {
                default_rack: default_rack(),
                racks: racks
                    .iter()
                    .map(|(h, r)| (h.to_string(), r.to_string()))
                    .collect(),
            },
            request: Some(RequestConfig {
                num_containers: 18,
                locality_aware_tasks: 60,
                local_tasks: hosts.iter().map(|(h, c)| (h.to_string(), *c)).collect(),
            }),
            allocated: BTreeMap::new(),
            pending: Vec::new(),
        }
    }
}
