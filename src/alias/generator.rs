//! alias::generator
//!
//! Turns a candidate alias for a source into a stored, scope-unique alias.
//!
//! # Lifecycle
//!
//! ```text
//! clean → alter → (lock) → update policy → uniquify → save → retry on collision
//! ```
//!
//! - Language `zxx` is stored as `und`.
//! - Alter hooks run in registration order and may rewrite the alias or
//!   language. An alias altered to nothing produces no alias.
//! - On update operations an existing alias for the source is either kept
//!   (`no-new`), replaced in place (`replace`) or left alongside a new row
//!   (`leave`).
//! - When a lock directory is set, the update-policy lookup, uniquify and
//!   save all run under the scope lock. A collision reported by the store at
//!   save time resumes the suffix search past the colliding counter, never
//!   with the unsuffixed alias again.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::context::TenantContext;
use super::uniquifier::{AliasUniquifier, UniquifyError, Uniquified};
use crate::core::config::schema::UpdateAction;
use crate::core::config::Config;
use crate::core::naming::clean_alias;
use crate::core::ops::lock::{LockError, ScopeLock};
use crate::core::types::{AliasDraft, AliasPath, AliasRecord, LangCode, Scope, SourcePath};
use crate::store::StoreError;

/// Why an alias is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    BulkUpdate,
    /// Compute the alias without saving it.
    Return,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::BulkUpdate => "bulkupdate",
            Operation::Return => "return",
        }
    }

    fn is_update(&self) -> bool {
        matches!(self, Operation::Update | Operation::BulkUpdate)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input to [`AliasGenerator::generate`].
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Raw source path; a malformed source yields no alias.
    pub source: String,
    /// Raw candidate alias, cleaned before use.
    pub alias: String,
    pub language: LangCode,
    pub op: Operation,
}

impl GenerateRequest {
    pub fn new(
        source: impl Into<String>,
        alias: impl Into<String>,
        language: LangCode,
        op: Operation,
    ) -> Self {
        Self {
            source: source.into(),
            alias: alias.into(),
            language,
            op,
        }
    }
}

/// Mutable view handed to alter hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasContext {
    pub alias: String,
    pub source: SourcePath,
    pub language: LangCode,
    pub op: Operation,
}

/// Hook that may rewrite a candidate alias before it is made unique.
pub trait AliasAlter: Send + Sync {
    fn alter(&self, context: &mut AliasContext);
}

impl<F> AliasAlter for F
where
    F: Fn(&mut AliasContext) + Send + Sync,
{
    fn alter(&self, context: &mut AliasContext) {
        self(context)
    }
}

/// A generated alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// The alias actually assigned.
    pub alias: AliasPath,
    /// The candidate before uniquification.
    pub original: AliasPath,
    /// The stored row; `None` for [`Operation::Return`].
    pub record: Option<AliasRecord>,
}

impl Generated {
    /// Whether uniquification changed the candidate.
    pub fn renamed(&self) -> bool {
        self.alias != self.original
    }
}

/// Errors from alias generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Uniquify(#[from] UniquifyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lock(#[from] LockError),

    /// Every save attempt collided with a concurrent writer.
    #[error("alias '{alias}' kept colliding on save after {attempts} attempts")]
    SaveRetriesExhausted { alias: AliasPath, attempts: u32 },
}

/// Generates and stores aliases.
pub struct AliasGenerator {
    uniquifier: AliasUniquifier,
    alters: Vec<Box<dyn AliasAlter>>,
    update_action: UpdateAction,
    lock_dir: Option<PathBuf>,
}

impl std::fmt::Debug for AliasGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliasGenerator")
            .field("uniquifier", &self.uniquifier)
            .field("alters", &self.alters.len())
            .field("update_action", &self.update_action)
            .field("lock_dir", &self.lock_dir)
            .finish()
    }
}

impl AliasGenerator {
    pub fn new(uniquifier: AliasUniquifier) -> Self {
        Self {
            uniquifier,
            alters: Vec::new(),
            update_action: UpdateAction::default(),
            lock_dir: None,
        }
    }

    /// Take the update action and lock directory from configuration.
    pub fn configured(uniquifier: AliasUniquifier, config: &Config) -> Self {
        Self::new(uniquifier)
            .with_update_action(config.update_action())
            .with_lock_dir(config.lock_dir())
    }

    pub fn with_update_action(mut self, action: UpdateAction) -> Self {
        self.update_action = action;
        self
    }

    pub fn with_lock_dir(mut self, lock_dir: Option<PathBuf>) -> Self {
        self.lock_dir = lock_dir;
        self
    }

    /// Register an alter hook. Hooks run in registration order.
    pub fn with_alter(mut self, alter: impl AliasAlter + 'static) -> Self {
        self.alters.push(Box::new(alter));
        self
    }

    pub fn uniquifier(&self) -> &AliasUniquifier {
        &self.uniquifier
    }

    /// Generate an alias for `request` in the tenant's scope.
    ///
    /// Returns `Ok(None)` when no alias is produced: malformed source, an
    /// alias altered away, or an existing alias under `no-new`.
    pub fn generate(
        &self,
        request: &GenerateRequest,
        tenant: &TenantContext,
    ) -> Result<Option<Generated>, GenerateError> {
        let Ok(source) = SourcePath::new(request.source.as_str()) else {
            debug!(source = %request.source, "malformed source, no alias generated");
            return Ok(None);
        };

        let max_length = self.uniquifier.settings().max_length;
        let mut context = AliasContext {
            alias: clean_alias(&request.alias, max_length),
            source,
            language: request.language.clone().normalized(),
            op: request.op,
        };
        for alter in &self.alters {
            alter.alter(&mut context);
        }

        let AliasContext {
            alias,
            source,
            language,
            op,
        } = context;
        let language = language.normalized();

        let cleaned = clean_alias(&alias, max_length);
        if cleaned.is_empty() {
            debug!(%source, "alias is empty after alteration");
            return Ok(None);
        }
        let original = AliasPath::new(cleaned).map_err(UniquifyError::from)?;

        let domain = tenant.domain_id().cloned();
        let scope = Scope::new(domain.clone(), language.clone());
        let store = self.uniquifier.store();

        // Held from the update-policy lookup through the save
        let _lock = match (&self.lock_dir, op) {
            (Some(dir), op) if op != Operation::Return => Some(ScopeLock::acquire(dir, &scope)?),
            _ => None,
        };

        let existing = if op.is_update() {
            store.load_by_source(&source, &scope)?
        } else {
            None
        };
        if existing.is_some() && self.update_action == UpdateAction::NoNew {
            debug!(%source, %scope, "source already aliased, update action is no-new");
            return Ok(None);
        }

        if self
            .uniquifier
            .is_reserved(&original, &source, &language, domain.as_ref())?
        {
            warn!(
                alias = %original,
                %source,
                %scope,
                op = op.as_str(),
                "path alias should be unique in its scope"
            );
        }

        let mut uniquified =
            self.uniquifier
                .uniquify_from(&original, &source, &language, domain.as_ref(), 0)?;
        if uniquified.alias != original {
            info!(
                original = %original,
                alias = %uniquified.alias,
                %scope,
                "generated alias conflicted with an existing alias, renamed"
            );
        }

        if op == Operation::Return {
            return Ok(Some(Generated {
                alias: uniquified.alias,
                original,
                record: None,
            }));
        }

        let max_attempts = self.uniquifier.settings().max_attempts;
        let mut attempts = 0u32;
        loop {
            let candidate = uniquified.alias.clone();

            if let Some(record) = self.unchanged(&candidate, &source, &scope, existing.as_ref())? {
                debug!(alias = %candidate, %scope, "alias unchanged, nothing to save");
                return Ok(Some(Generated {
                    alias: candidate,
                    original,
                    record: Some(record),
                }));
            }

            let mut draft = AliasDraft::new(
                source.clone(),
                candidate.clone(),
                language.clone(),
                domain.clone(),
            );
            if let (Some(existing), UpdateAction::Replace) = (&existing, self.update_action) {
                draft = draft.with_id(existing.id);
            }

            match store.save(draft) {
                Ok(record) => {
                    info!(alias = %record.alias, source = %record.source, %scope, id = record.id.0, "alias saved");
                    return Ok(Some(Generated {
                        alias: candidate,
                        original,
                        record: Some(record),
                    }));
                }
                Err(StoreError::UniqueViolation { .. }) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        return Err(GenerateError::SaveRetriesExhausted {
                            alias: candidate,
                            attempts,
                        });
                    }
                    let start = next_counter(&uniquified);
                    warn!(alias = %candidate, %scope, next = start, "alias taken concurrently, retrying");
                    uniquified = self.uniquifier.suffix_from(
                        &original,
                        &source,
                        &language,
                        domain.as_ref(),
                        start,
                    )?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// The stored row if `candidate` is already what the source has.
    fn unchanged(
        &self,
        candidate: &AliasPath,
        source: &SourcePath,
        scope: &Scope,
        existing: Option<&AliasRecord>,
    ) -> Result<Option<AliasRecord>, StoreError> {
        if let Some(existing) = existing {
            if &existing.alias == candidate {
                return Ok(Some(existing.clone()));
            }
        }
        Ok(self
            .uniquifier
            .store()
            .find_by_scope(candidate, scope)?
            .filter(|record| &record.source == source))
    }
}

fn next_counter(uniquified: &Uniquified) -> u32 {
    uniquified.suffix.map_or(0, |s| s.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::uniquifier::UniquifySettings;
    use crate::core::types::DomainId;
    use crate::store::{AliasStore, FailOn, MemoryAliasStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn en() -> LangCode {
        LangCode::new("en").unwrap()
    }

    fn domain(d: &str) -> DomainId {
        DomainId::new(d).unwrap()
    }

    fn tenant(d: &str) -> TenantContext {
        TenantContext::new(Some(domain(d)))
    }

    fn generator(store: &Arc<MemoryAliasStore>) -> AliasGenerator {
        let store: Arc<dyn AliasStore> = store.clone();
        AliasGenerator::new(AliasUniquifier::new(store, UniquifySettings::default()))
    }

    fn insert(source: &str, alias: &str) -> GenerateRequest {
        GenerateRequest::new(source, alias, en(), Operation::Insert)
    }

    #[test]
    fn two_domains_share_an_alias() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store);

        let a = g.generate(&insert("/node/1", "/contact"), &tenant("example_com")).unwrap().unwrap();
        assert_eq!(a.alias.as_str(), "/contact");

        let b = g.generate(&insert("/node/2", "/contact"), &tenant("example_com")).unwrap().unwrap();
        assert_eq!(b.alias.as_str(), "/contact-0");
        assert!(b.renamed());

        let c = g
            .generate(&insert("/node/3", "/contact"), &tenant("domain1_example_com"))
            .unwrap()
            .unwrap();
        assert_eq!(c.alias.as_str(), "/contact");
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn candidate_is_cleaned() {
        let store = Arc::new(MemoryAliasStore::new());
        let out = generator(&store)
            .generate(&insert("/node/1", " blog//post/ "), &TenantContext::global())
            .unwrap()
            .unwrap();
        assert_eq!(out.alias.as_str(), "/blog/post");
    }

    #[test]
    fn malformed_source_produces_nothing() {
        let store = Arc::new(MemoryAliasStore::new());
        let out = generator(&store)
            .generate(&insert("node/1", "/x"), &TenantContext::global())
            .unwrap();
        assert!(out.is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn not_applicable_language_is_stored_unspecified() {
        let store = Arc::new(MemoryAliasStore::new());
        let request = GenerateRequest::new("/node/1", "/x", LangCode::new("zxx").unwrap(), Operation::Insert);
        let out = generator(&store).generate(&request, &TenantContext::global()).unwrap().unwrap();
        assert!(out.record.unwrap().language.is_not_specified());
    }

    #[test]
    fn alters_run_in_order() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store)
            .with_alter(|ctx: &mut AliasContext| ctx.alias.push_str("-a"))
            .with_alter(|ctx: &mut AliasContext| ctx.alias.push_str("-b"));
        let out = g.generate(&insert("/node/1", "/x"), &TenantContext::global()).unwrap().unwrap();
        assert_eq!(out.alias.as_str(), "/x-a-b");
    }

    #[test]
    fn alter_to_empty_produces_nothing() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store).with_alter(|ctx: &mut AliasContext| ctx.alias.clear());
        assert!(g.generate(&insert("/node/1", "/x"), &TenantContext::global()).unwrap().is_none());
    }

    #[test]
    fn return_op_does_not_save() {
        let store = Arc::new(MemoryAliasStore::new());
        let request = GenerateRequest::new("/node/1", "/x", en(), Operation::Return);
        let out = generator(&store).generate(&request, &TenantContext::global()).unwrap().unwrap();
        assert_eq!(out.alias.as_str(), "/x");
        assert!(out.record.is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn regenerating_same_alias_writes_nothing() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store);
        g.generate(&insert("/node/1", "/x"), &tenant("a")).unwrap();
        let again = g.generate(&insert("/node/1", "/x"), &tenant("a")).unwrap().unwrap();
        assert_eq!(again.alias.as_str(), "/x");
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn update_replace_rewrites_in_place() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store);
        let first = g.generate(&insert("/node/1", "/old"), &tenant("a")).unwrap().unwrap();

        let request = GenerateRequest::new("/node/1", "/new", en(), Operation::Update);
        let second = g.generate(&request, &tenant("a")).unwrap().unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(second.record.unwrap().id, first.record.unwrap().id);
        assert_eq!(records[0].alias.as_str(), "/new");
    }

    #[test]
    fn update_leave_adds_a_row() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store).with_update_action(UpdateAction::Leave);
        g.generate(&insert("/node/1", "/old"), &tenant("a")).unwrap();

        let request = GenerateRequest::new("/node/1", "/new", en(), Operation::BulkUpdate);
        g.generate(&request, &tenant("a")).unwrap().unwrap();
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn update_no_new_keeps_existing() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store).with_update_action(UpdateAction::NoNew);
        g.generate(&insert("/node/1", "/old"), &tenant("a")).unwrap();

        let request = GenerateRequest::new("/node/1", "/new", en(), Operation::Update);
        assert!(g.generate(&request, &tenant("a")).unwrap().is_none());
        assert_eq!(store.list().unwrap()[0].alias.as_str(), "/old");
    }

    #[test]
    fn update_no_new_without_existing_inserts() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store).with_update_action(UpdateAction::NoNew);
        let request = GenerateRequest::new("/node/1", "/new", en(), Operation::Update);
        assert!(g.generate(&request, &tenant("a")).unwrap().is_some());
    }

    #[test]
    fn concurrent_collision_retries_with_next_suffix() {
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store);
        store.preempt_next_save(AliasDraft::new(
            SourcePath::new("/node/9").unwrap(),
            AliasPath::new("/contact").unwrap(),
            en(),
            Some(domain("a")),
        ));

        let out = g.generate(&insert("/node/1", "/contact"), &tenant("a")).unwrap().unwrap();
        assert_eq!(out.alias.as_str(), "/contact-0");
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn store_failure_propagates() {
        let store = Arc::new(MemoryAliasStore::new().fail_on(FailOn::Writes));
        let err = generator(&store)
            .generate(&insert("/node/1", "/x"), &TenantContext::global())
            .unwrap_err();
        assert!(matches!(err, GenerateError::Store(StoreError::Unavailable(_))));
    }

    #[test]
    fn saves_under_scope_lock() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(MemoryAliasStore::new());
        let g = generator(&store).with_lock_dir(Some(temp.path().join("locks")));

        let out = g.generate(&insert("/node/1", "/x"), &tenant("a")).unwrap().unwrap();
        assert_eq!(out.alias.as_str(), "/x");

        // Lock is released once generation returns
        let scope = Scope::new(Some(domain("a")), en());
        assert!(ScopeLock::try_acquire(&temp.path().join("locks"), &scope).is_ok());
    }

    #[test]
    fn self_referencing_row_collision_gets_suffix() {
        // The reservation check ignores a /contact -> /contact row but the
        // store index still rejects the plain alias
        let store = Arc::new(
            MemoryAliasStore::with_drafts([AliasDraft::new(
                SourcePath::new("/contact").unwrap(),
                AliasPath::new("/contact").unwrap(),
                en(),
                Some(domain("a")),
            )])
            .unwrap(),
        );
        let out = generator(&store)
            .generate(&insert("/node/2", "/contact"), &tenant("a"))
            .unwrap()
            .unwrap();
        assert_eq!(out.alias.as_str(), "/contact-0");
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn unscoped_insert_avoids_older_global_row() {
        let store = Arc::new(
            MemoryAliasStore::with_drafts([
                AliasDraft::new(
                    SourcePath::new("/node/1").unwrap(),
                    AliasPath::new("/contact").unwrap(),
                    en(),
                    None,
                ),
                AliasDraft::new(
                    SourcePath::new("/node/5").unwrap(),
                    AliasPath::new("/contact").unwrap(),
                    en(),
                    Some(domain("x")),
                ),
            ])
            .unwrap(),
        );
        let out = generator(&store)
            .generate(&insert("/node/5", "/contact"), &TenantContext::global())
            .unwrap()
            .unwrap();
        assert_eq!(out.alias.as_str(), "/contact-0");
    }

    /// Records whether the scope lock was held when the update policy ran.
    struct LockObservingStore {
        inner: MemoryAliasStore,
        lock_dir: PathBuf,
        held_during_lookup: std::sync::Mutex<Option<bool>>,
    }

    impl AliasStore for LockObservingStore {
        fn find_by_scope(
            &self,
            alias: &AliasPath,
            scope: &Scope,
        ) -> Result<Option<AliasRecord>, StoreError> {
            self.inner.find_by_scope(alias, scope)
        }

        fn find_global(
            &self,
            alias: &AliasPath,
            language: &LangCode,
        ) -> Result<Option<AliasRecord>, StoreError> {
            self.inner.find_global(alias, language)
        }

        fn load_by_source(
            &self,
            source: &SourcePath,
            scope: &Scope,
        ) -> Result<Option<AliasRecord>, StoreError> {
            let held = matches!(
                ScopeLock::try_acquire(&self.lock_dir, scope),
                Err(LockError::AlreadyLocked(_))
            );
            *self.held_during_lookup.lock().unwrap() = Some(held);
            self.inner.load_by_source(source, scope)
        }

        fn find_conflict(
            &self,
            query: &crate::store::ConflictQuery,
        ) -> Result<Option<AliasRecord>, StoreError> {
            self.inner.find_conflict(query)
        }

        fn save(&self, draft: AliasDraft) -> Result<AliasRecord, StoreError> {
            self.inner.save(draft)
        }

        fn list(&self) -> Result<Vec<AliasRecord>, StoreError> {
            self.inner.list()
        }
    }

    #[test]
    fn update_policy_lookup_runs_under_scope_lock() {
        let temp = TempDir::new().unwrap();
        let lock_dir = temp.path().join("locks");
        let inner = MemoryAliasStore::with_drafts([AliasDraft::new(
            SourcePath::new("/node/1").unwrap(),
            AliasPath::new("/old").unwrap(),
            en(),
            Some(domain("a")),
        )])
        .unwrap();
        let store = Arc::new(LockObservingStore {
            inner,
            lock_dir: lock_dir.clone(),
            held_during_lookup: std::sync::Mutex::new(None),
        });
        let shared: Arc<dyn AliasStore> = store.clone();
        let g = AliasGenerator::new(AliasUniquifier::new(shared, UniquifySettings::default()))
            .with_lock_dir(Some(lock_dir));

        let request = GenerateRequest::new("/node/1", "/new", en(), Operation::Update);
        let out = g.generate(&request, &tenant("a")).unwrap().unwrap();

        assert_eq!(out.alias.as_str(), "/new");
        assert_eq!(*store.held_during_lookup.lock().unwrap(), Some(true));
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
