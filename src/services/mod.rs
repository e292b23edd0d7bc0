// Service exports
pub mod store;

pub use store::{TrainingStore, JsonFileStore, MemoryStore, StoreError, UpsertOutcome, DEFAULT_MAX_EXAMPLES};
