pub mod aggregator;
pub mod engine;
pub mod placement;
pub mod reader;
pub mod report;
pub mod selector;

pub use crate::domain::model::{AccumulatorEntry, ExtraScore, Place, PlacementRecord, Roster};
pub use crate::domain::ports::{RandomSource, RecordStore, RngSource};
pub use crate::utils::error::Result;
