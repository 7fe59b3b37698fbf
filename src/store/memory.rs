//! store::memory
//!
//! In-memory alias store for tests and embedding.
//!
//! # Design
//!
//! Records live behind an `Arc<Mutex<...>>` so clones share state. The store
//! can be told to fail reads or writes, and to let a simulated concurrent
//! writer claim an alias just before the next save, which exercises the
//! retry path of the generator.
//!
//! # Example
//!
//! ```
//! use domain_alias::store::{AliasStore, FailOn, MemoryAliasStore, StoreError};
//! use domain_alias::core::types::{AliasPath, LangCode, Scope};
//!
//! let store = MemoryAliasStore::new().fail_on(FailOn::Reads);
//! let scope = Scope::new(None, LangCode::new("en").unwrap());
//! let err = store
//!     .find_by_scope(&AliasPath::new("/contact").unwrap(), &scope)
//!     .unwrap_err();
//! assert!(matches!(err, StoreError::Unavailable(_)));
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use super::query;
use super::traits::{AliasStore, ConflictQuery, StoreError};
use crate::core::types::{
    AliasDraft, AliasPath, AliasRecord, LangCode, Scope, SourcePath,
};

/// In-memory alias store.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MemoryAliasStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug)]
struct MemoryInner {
    records: Vec<AliasRecord>,
    next_id: u64,
    fail_on: Option<FailOn>,
    /// Drafts a "concurrent writer" persists right before the next save.
    preempt: Vec<AliasDraft>,
    /// Number of successful saves.
    saves: usize,
}

impl Default for MemoryInner {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            fail_on: None,
            preempt: Vec::new(),
            saves: 0,
        }
    }
}

/// Which operations should fail with [`StoreError::Unavailable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Reads,
    Writes,
    All,
}

impl MemoryAliasStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with drafts, saved in order.
    ///
    /// # Errors
    ///
    /// Fails if the seed itself violates the uniqueness index.
    pub fn with_drafts(drafts: impl IntoIterator<Item = AliasDraft>) -> Result<Self, StoreError> {
        let store = Self::new();
        for draft in drafts {
            store.save(draft)?;
        }
        Ok(store)
    }

    /// Configure the store to fail.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.guard().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.guard().fail_on = None;
    }

    /// Have a competing writer persist `draft` immediately before the next
    /// call to [`AliasStore::save`].
    pub fn preempt_next_save(&self, draft: AliasDraft) {
        self.guard().preempt.push(draft);
    }

    /// Number of successful saves so far (seeding included).
    pub fn save_count(&self) -> usize {
        self.guard().saves
    }

    fn guard(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        let inner = self.guard();
        match inner.fail_on {
            Some(FailOn::Reads) | Some(FailOn::All) => {
                Err(StoreError::Unavailable("memory store configured to fail reads".into()))
            }
            _ => Ok(inner),
        }
    }

    fn write(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        let inner = self.guard();
        match inner.fail_on {
            Some(FailOn::Writes) | Some(FailOn::All) => {
                Err(StoreError::Unavailable("memory store configured to fail writes".into()))
            }
            _ => Ok(inner),
        }
    }
}

impl AliasStore for MemoryAliasStore {
    fn find_by_scope(
        &self,
        alias: &AliasPath,
        scope: &Scope,
    ) -> Result<Option<AliasRecord>, StoreError> {
        Ok(query::find_by_scope(&self.read()?.records, alias, scope))
    }

    fn find_global(
        &self,
        alias: &AliasPath,
        language: &LangCode,
    ) -> Result<Option<AliasRecord>, StoreError> {
        Ok(query::find_global(&self.read()?.records, alias, language))
    }

    fn load_by_source(
        &self,
        source: &SourcePath,
        scope: &Scope,
    ) -> Result<Option<AliasRecord>, StoreError> {
        Ok(query::load_by_source(&self.read()?.records, source, scope))
    }

    fn find_conflict(&self, query: &ConflictQuery) -> Result<Option<AliasRecord>, StoreError> {
        Ok(query::find_conflict(&self.read()?.records, query))
    }

    fn save(&self, draft: AliasDraft) -> Result<AliasRecord, StoreError> {
        let mut inner = self.write()?;
        let MemoryInner {
            records,
            next_id,
            preempt,
            saves,
            ..
        } = &mut *inner;

        for competing in preempt.drain(..) {
            query::apply_save(records, next_id, competing)?;
            *saves += 1;
        }

        let record = query::apply_save(records, next_id, draft)?;
        *saves += 1;
        Ok(record)
    }

    fn list(&self) -> Result<Vec<AliasRecord>, StoreError> {
        let mut records = self.read()?.records.clone();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DomainId;

    fn draft(source: &str, alias: &str, domain: Option<&str>) -> AliasDraft {
        AliasDraft::new(
            SourcePath::new(source).unwrap(),
            AliasPath::new(alias).unwrap(),
            LangCode::new("en").unwrap(),
            domain.map(|d| DomainId::new(d).unwrap()),
        )
    }

    #[test]
    fn save_and_list() {
        let store = MemoryAliasStore::new();
        store.save(draft("/node/1", "/a", None)).unwrap();
        store.save(draft("/node/2", "/b", None)).unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].alias.as_str(), "/a");
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryAliasStore::new();
        let clone = store.clone();
        store.save(draft("/node/1", "/a", None)).unwrap();
        assert_eq!(clone.list().unwrap().len(), 1);
    }

    #[test]
    fn seeding_rejects_duplicates() {
        let result = MemoryAliasStore::with_drafts(vec![
            draft("/node/1", "/a", Some("x")),
            draft("/node/2", "/a", Some("x")),
        ]);
        assert!(matches!(result, Err(StoreError::UniqueViolation { .. })));
    }

    #[test]
    fn fail_on_writes_keeps_reads_working() {
        let store = MemoryAliasStore::new().fail_on(FailOn::Writes);
        assert!(store.list().is_ok());
        assert!(matches!(
            store.save(draft("/node/1", "/a", None)),
            Err(StoreError::Unavailable(_))
        ));

        store.clear_fail_on();
        assert!(store.save(draft("/node/1", "/a", None)).is_ok());
    }

    #[test]
    fn preempted_save_collides() {
        let store = MemoryAliasStore::new();
        store.preempt_next_save(draft("/node/9", "/a", None));

        let err = store.save(draft("/node/1", "/a", None)).unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        // The competing writer's record persisted; the preemption is spent
        assert_eq!(store.list().unwrap()[0].source.as_str(), "/node/9");
        assert!(store.save(draft("/node/1", "/a-0", None)).is_ok());
    }
}
