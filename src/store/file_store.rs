//! store::file_store
//!
//! JSON-file alias store.
//!
//! # Architecture
//!
//! The whole alias table is one JSON document:
//!
//! ```json
//! {
//!   "kind": "dalias.alias-store",
//!   "schema_version": 1,
//!   "next_id": 3,
//!   "updated_at": "2026-01-01T00:00:00Z",
//!   "records": [ { "id": 1, "source": "/node/1", "alias": "/contact", "language": "en", "domain": "example_com" } ]
//! }
//! ```
//!
//! Every operation takes an exclusive [`FileLock`] on `<path>.lock`, so
//! read-modify-write cycles from separate processes are serialised and the
//! uniqueness index holds across processes. Writes go to a temp file that
//! is renamed into place.
//!
//! A missing file is an empty store. A file that exists but cannot be read
//! or decoded is an error, never "no aliases".

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::query;
use super::traits::{AliasStore, ConflictQuery, StoreError};
use crate::core::ops::lock::FileLock;
use crate::core::paths::SitePaths;
use crate::core::types::{
    AliasDraft, AliasPath, AliasRecord, LangCode, Scope, SourcePath,
};

/// The kind identifier for the store document.
pub const STORE_KIND: &str = "dalias.alias-store";

/// Current schema version.
pub const STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreDocument {
    kind: String,
    schema_version: u32,
    next_id: u64,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    records: Vec<AliasRecord>,
}

impl StoreDocument {
    fn empty() -> Self {
        Self {
            kind: STORE_KIND.to_string(),
            schema_version: STORE_SCHEMA_VERSION,
            next_id: 1,
            updated_at: Utc::now(),
            records: Vec::new(),
        }
    }
}

/// Alias store persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileAliasStore {
    path: PathBuf,
}

impl FileAliasStore {
    /// Open (or lazily create) the store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location for a site.
    pub fn for_site(paths: &SitePaths) -> Self {
        Self::new(paths.default_store_path())
    }

    /// Path to the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn lock(&self) -> Result<FileLock, StoreError> {
        FileLock::acquire(&self.lock_path()).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreDocument::empty())
            }
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let doc: StoreDocument = serde_json::from_str(&contents)
            .map_err(|e| StoreError::ReadError(format!("{}: {}", self.path.display(), e)))?;

        if doc.kind != STORE_KIND {
            return Err(StoreError::ReadError(format!(
                "invalid kind '{}', expected '{}'",
                doc.kind, STORE_KIND
            )));
        }
        if doc.schema_version != STORE_SCHEMA_VERSION {
            return Err(StoreError::ReadError(format!(
                "unsupported schema version {}, supported: {}",
                doc.schema_version, STORE_SCHEMA_VERSION
            )));
        }
        Ok(doc)
    }

    fn persist(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        let write_err = |e: std::io::Error| StoreError::WriteError(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents =
            serde_json::to_string_pretty(doc).map_err(|e| StoreError::WriteError(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(write_err)?;
        file.write_all(contents.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        fs::rename(&temp_path, &self.path).map_err(write_err)?;
        Ok(())
    }

    fn read_records<T>(&self, f: impl FnOnce(&[AliasRecord]) -> T) -> Result<T, StoreError> {
        let _lock = self.lock()?;
        let doc = self.load()?;
        Ok(f(&doc.records))
    }
}

impl AliasStore for FileAliasStore {
    fn find_by_scope(
        &self,
        alias: &AliasPath,
        scope: &Scope,
    ) -> Result<Option<AliasRecord>, StoreError> {
        self.read_records(|records| query::find_by_scope(records, alias, scope))
    }

    fn find_global(
        &self,
        alias: &AliasPath,
        language: &LangCode,
    ) -> Result<Option<AliasRecord>, StoreError> {
        self.read_records(|records| query::find_global(records, alias, language))
    }

    fn load_by_source(
        &self,
        source: &SourcePath,
        scope: &Scope,
    ) -> Result<Option<AliasRecord>, StoreError> {
        self.read_records(|records| query::load_by_source(records, source, scope))
    }

    fn find_conflict(&self, query: &ConflictQuery) -> Result<Option<AliasRecord>, StoreError> {
        self.read_records(|records| query::find_conflict(records, query))
    }

    fn save(&self, draft: AliasDraft) -> Result<AliasRecord, StoreError> {
        let _lock = self.lock()?;
        let mut doc = self.load()?;
        let record = query::apply_save(&mut doc.records, &mut doc.next_id, draft)?;
        doc.updated_at = Utc::now();
        self.persist(&doc)?;
        Ok(record)
    }

    fn list(&self) -> Result<Vec<AliasRecord>, StoreError> {
        self.read_records(|records| {
            let mut records = records.to_vec();
            records.sort_by_key(|r| r.id);
            records
        })
    }
}
