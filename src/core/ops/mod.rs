//! core::ops
//!
//! Locking for alias writes.
//!
//! # Modules
//!
//! - [`lock`] - File and per-scope advisory locks
//!
//! # Architecture
//!
//! Alias generation that persists:
//! 1. Acquires the scope lock for (domain, language)
//! 2. Checks reservation and derives a unique alias
//! 3. Saves through the store (which takes its own file lock)
//! 4. Releases the scope lock on drop

pub mod lock;

pub use lock::{FileLock, LockError, ScopeLock};
