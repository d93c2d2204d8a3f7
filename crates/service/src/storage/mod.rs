//! Storage abstractions for signups
//!
//! The whole signup list is the unit of persistence: `load` returns all of
//! it and `save` replaces all of it.

pub mod json_file_store;
pub mod memory_store;

use async_trait::async_trait;
use models::SignupRecord;

use crate::errors::ServiceError;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;

#[async_trait]
pub trait SignupStore: Send + Sync {
    /// All records in insertion order. A store that was never written is empty.
    async fn load(&self) -> Result<Vec<SignupRecord>, ServiceError>;
    /// Replace the stored list with `signups`.
    async fn save(&self, signups: &[SignupRecord]) -> Result<(), ServiceError>;
}
