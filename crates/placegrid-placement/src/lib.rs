//! placegrid-placement — locality-aware container placement.
//!
//! Given how many containers to request and where pending tasks would
//! like to run, decides which hosts and racks each container request
//! should list as preferences. It does NOT talk to a resource manager;
//! the caller submits the resulting requests.
//!
//! # Components
//!
//! - **`rack`** — host → rack resolution (static table, caching wrapper)
//! - **`state`** — already-granted containers per host
//! - **`normalize`** — pending task counts → additional containers per host
//! - **`allocator`** — per-host targets → one preference per container
//! - **`strategy`** — validated entry point tying the above together
//! - **`convert`** — conversions from scenario config types
//!
//! ```text
//! caller ─► validate ─► normalize (AllocationState) ─► allocate (RackResolver) ─► Vec<LocalityPreference>
//! ```

pub mod allocator;
pub mod convert;
pub mod error;
pub mod normalize;
pub mod rack;
pub mod state;
pub mod strategy;

pub use allocator::{RatioSnapshot, Split, allocate, split};
pub use convert::{PlacementInputs, config_to_inputs, config_to_strategy};
pub use error::{PlacementError, PlacementResult};
pub use normalize::{containers_needed, normalize, pending_share};
pub use rack::{CachingRackResolver, RackResolver, StaticRackResolver};
pub use state::{AllocationSnapshot, AllocationState};
pub use strategy::ContainerPlacementStrategy;
