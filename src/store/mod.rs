//! store
//!
//! Persistence for alias records.
//!
//! # Modules
//!
//! - [`traits`] - The [`AliasStore`] trait and its error type
//! - [`memory`] - In-memory backend with failure injection
//! - [`file_store`] - JSON file backend guarded by an OS file lock

pub mod file_store;
pub mod memory;
mod query;
pub mod traits;

pub use file_store::FileAliasStore;
pub use memory::{FailOn, MemoryAliasStore};
pub use traits::{AliasStore, ConflictQuery, StoreError};
