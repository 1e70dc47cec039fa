// Adapters layer: concrete record stores.

pub mod storage;

pub use storage::{LocalStore, MemoryStore};
