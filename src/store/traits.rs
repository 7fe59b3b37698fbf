//! store::traits
//!
//! Alias storage trait definition.
//!
//! # Design
//!
//! The `AliasStore` trait is the only doorway to persisted aliases. Lookups
//! are scope-aware; `save` enforces a uniqueness index on
//! (alias, language, domain) and reports collisions as
//! [`StoreError::UniqueViolation`] so callers can retry with a new suffix.
//!
//! Implementations must be thread-safe (Send + Sync).

use thiserror::Error;

use crate::core::types::{
    AliasDraft, AliasId, AliasPath, AliasRecord, DomainId, LangCode, Scope, SourcePath,
};

/// Errors from alias storage operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store cannot be reached. Callers must not treat this as
    /// "alias is free".
    #[error("alias store unavailable: {0}")]
    Unavailable(String),

    /// Another record already holds this alias in the scope.
    #[error("alias '{alias}' already exists in scope {scope}")]
    UniqueViolation { alias: AliasPath, scope: String },

    /// Update targeted a record that does not exist.
    #[error("alias record not found: {0}")]
    NotFound(AliasId),

    /// Failed to read or decode the store.
    #[error("failed to read alias store: {0}")]
    ReadError(String),

    /// Failed to encode or write the store.
    #[error("failed to write alias store: {0}")]
    WriteError(String),
}

impl StoreError {
    /// Whether retrying the whole operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Search for an alias that would collide with a record about to be saved.
///
/// Alias comparison is case-insensitive so differently capitalised
/// duplicates are caught.
#[derive(Debug, Clone)]
pub struct ConflictQuery {
    pub alias: AliasPath,
    pub language: LangCode,
    /// Restrict to this domain when set.
    pub domain: Option<DomainId>,
    /// Ignore the record being edited.
    pub exclude_id: Option<AliasId>,
    /// Ignore records for the same source.
    pub exclude_source: Option<SourcePath>,
}

/// Trait for alias storage backends.
///
/// # Example
///
/// ```
/// use domain_alias::core::types::{AliasDraft, AliasPath, LangCode, Scope, SourcePath};
/// use domain_alias::store::{AliasStore, MemoryAliasStore};
///
/// let store = MemoryAliasStore::new();
/// let en = LangCode::new("en").unwrap();
/// let draft = AliasDraft::new(
///     SourcePath::new("/node/1").unwrap(),
///     AliasPath::new("/contact").unwrap(),
///     en.clone(),
///     None,
/// );
/// store.save(draft).unwrap();
///
/// let found = store
///     .find_by_scope(&AliasPath::new("/contact").unwrap(), &Scope::new(None, en))
///     .unwrap();
/// assert_eq!(found.unwrap().source.as_str(), "/node/1");
/// ```
pub trait AliasStore: Send + Sync {
    /// Find the record holding `alias` in exactly this scope.
    fn find_by_scope(
        &self,
        alias: &AliasPath,
        scope: &Scope,
    ) -> Result<Option<AliasRecord>, StoreError>;

    /// Find a record holding `alias` in any domain.
    ///
    /// Records in `language` win over `und` records; among equals the most
    /// recently created wins.
    fn find_global(
        &self,
        alias: &AliasPath,
        language: &LangCode,
    ) -> Result<Option<AliasRecord>, StoreError>;

    /// Find the most recent alias for `source` in the scope.
    fn load_by_source(
        &self,
        source: &SourcePath,
        scope: &Scope,
    ) -> Result<Option<AliasRecord>, StoreError>;

    /// Find a record conflicting with a pending save.
    fn find_conflict(&self, query: &ConflictQuery) -> Result<Option<AliasRecord>, StoreError>;

    /// Insert (`draft.id == None`) or update a record.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UniqueViolation`] if another record holds the alias in the scope
    /// - [`StoreError::NotFound`] if updating a missing record
    fn save(&self, draft: AliasDraft) -> Result<AliasRecord, StoreError>;

    /// All records, ordered by id.
    fn list(&self) -> Result<Vec<AliasRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StoreError::Unavailable("connection refused".into());
        assert!(err.to_string().contains("unavailable"));
        assert!(err.is_transient());

        let err = StoreError::UniqueViolation {
            alias: AliasPath::new("/contact").unwrap(),
            scope: "example_com:en".into(),
        };
        assert!(err.to_string().contains("/contact"));
        assert!(err.to_string().contains("example_com:en"));
        assert!(!err.is_transient());

        let err = StoreError::NotFound(AliasId(3));
        assert!(err.to_string().contains("3"));
    }
}
