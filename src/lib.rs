pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStore, MemoryStore};
pub use config::{LayoutConfig, PlacerConfig};
pub use crate::core::{engine::Placer, RandomSource, RecordStore, RngSource};
pub use utils::error::{PlacerError, Result};
