//! core::ops::lock
//!
//! Advisory file locks for alias writes.
//!
//! # Architecture
//!
//! Two lock granularities exist:
//!
//! - [`FileLock`] guards a single file (the JSON store takes one around
//!   every read-modify-write).
//! - [`ScopeLock`] serialises the check-then-save sequence of alias
//!   generation for one (domain, language) scope. The lock file name is the
//!   SHA-256 of the scope key, so any domain id or language maps to a safe
//!   file name.
//!
//! # Invariants
//!
//! - Locks are released on drop (RAII pattern)
//! - `acquire` blocks until the lock is available; `try_acquire` fails fast
//! - Locks are OS-level (`fs2`) and therefore work across processes
//!
//! # Example
//!
//! ```no_run
//! use domain_alias::core::ops::lock::ScopeLock;
//! use domain_alias::core::types::{LangCode, Scope};
//! use std::path::Path;
//!
//! let scope = Scope::new(None, LangCode::new("en").unwrap());
//! let lock = ScopeLock::acquire(Path::new("/srv/site/.dalias/locks"), &scope).unwrap();
//! // check and save while holding the lock
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::types::Scope;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("lock is held by another process: {0}")]
    AlreadyLocked(PathBuf),

    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// An exclusive lock on a lock file.
///
/// The lock is automatically released when this guard is dropped.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    /// When this is Some, we hold the lock.
    file: Option<File>,
}

impl FileLock {
    fn open(path: &Path) -> Result<File, LockError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LockError::CreateFailed(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e)))
    }

    /// Acquire the lock, blocking until it is free.
    ///
    /// # Errors
    ///
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let file = Self::open(path)?;
        file.lock_exclusive()
            .map_err(|e| LockError::AcquireFailed(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
        })
    }

    /// Acquire the lock without blocking.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another holder has it
    pub fn try_acquire(path: &Path) -> Result<Self, LockError> {
        let file = Self::open(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path: path.to_path_buf(),
                file: Some(file),
            }),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(LockError::AlreadyLocked(path.to_path_buf()))
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly. Safe to call more than once.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Best-effort release on drop
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}

/// Exclusive lock on one alias scope.
#[derive(Debug)]
pub struct ScopeLock {
    scope: Scope,
    lock: FileLock,
}

impl ScopeLock {
    /// Lock file path for `scope` inside `lock_dir`.
    ///
    /// # Example
    ///
    /// ```
    /// use domain_alias::core::ops::lock::ScopeLock;
    /// use domain_alias::core::types::{LangCode, Scope};
    /// use std::path::Path;
    ///
    /// let scope = Scope::new(None, LangCode::new("en").unwrap());
    /// let path = ScopeLock::lock_path(Path::new("/locks"), &scope);
    /// assert!(path.starts_with("/locks"));
    /// assert_eq!(path.extension().unwrap(), "lock");
    /// ```
    pub fn lock_path(lock_dir: &Path, scope: &Scope) -> PathBuf {
        let digest = Sha256::digest(scope.key().as_bytes());
        lock_dir.join(format!("{}.lock", hex::encode(&digest[..16])))
    }

    /// Acquire the scope lock, blocking until it is free.
    pub fn acquire(lock_dir: &Path, scope: &Scope) -> Result<Self, LockError> {
        let lock = FileLock::acquire(&Self::lock_path(lock_dir, scope))?;
        Ok(Self {
            scope: scope.clone(),
            lock,
        })
    }

    /// Acquire the scope lock without blocking.
    pub fn try_acquire(lock_dir: &Path, scope: &Scope) -> Result<Self, LockError> {
        let lock = FileLock::try_acquire(&Self::lock_path(lock_dir, scope))?;
        Ok(Self {
            scope: scope.clone(),
            lock,
        })
    }

    /// The locked scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.lock.is_held()
    }

    /// Release the lock explicitly.
    pub fn release(&mut self) -> Result<(), LockError> {
        self.lock.release()
    }
}
