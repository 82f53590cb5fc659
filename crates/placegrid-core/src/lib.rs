//! placegrid-core — shared types and scenario configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::PlacegridConfig;
pub use error::ConfigError;
pub use types::*;
