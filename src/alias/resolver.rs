//! alias::resolver
//!
//! Alias-to-source resolution with a domain-scoped first pass.
//!
//! # Architecture
//!
//! [`AliasResolver`] wraps an inner [`PathLookup`] that knows nothing about
//! domains. Resolution:
//!
//! 1. Static asset paths (`.css`, `.png`, ...) are returned untouched.
//! 2. With a tenant domain, the record for (alias, domain, language) wins.
//! 3. Otherwise the inner lookup decides.
//! 4. Nothing found: the alias itself is the path.
//!
//! The resolver remembers the last record it resolved through the domain
//! pass. The cache is only an optimisation; nothing reads it for
//! correctness.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, trace};

use super::context::{LanguageContext, TenantContext};
use crate::core::types::{AliasPath, AliasRecord, LangCode, Scope};
use crate::store::{AliasStore, StoreError};

/// File extensions that are never resolved as aliases.
pub const ASSET_EXTENSIONS: &[&str] = &["svg", "png", "jpeg", "jpg", "css", "js", "gif", "webp", "ts"];

/// Errors from alias resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Whether `alias` names a static asset by its extension.
///
/// The extension is taken from the last path segment and any query string
/// is ignored.
///
/// # Example
///
/// ```
/// use domain_alias::alias::resolver::is_asset_path;
///
/// assert!(is_asset_path("/themes/site/logo.svg"));
/// assert!(is_asset_path("/core/misc/drupal.js?v=10.1"));
/// assert!(!is_asset_path("/about-us"));
/// assert!(!is_asset_path("/archive.tar.gz"));
/// ```
pub fn is_asset_path(alias: &str) -> bool {
    let trimmed = alias.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let Some((_, extension)) = segment.rsplit_once('.') else {
        return false;
    };
    let extension = extension.split('?').next().unwrap_or(extension);
    ASSET_EXTENSIONS.contains(&extension)
}

/// Non-domain alias lookup used when the domain pass finds nothing.
pub trait PathLookup: Send + Sync {
    /// The source path for `alias`, if any.
    fn lookup_path(&self, alias: &AliasPath, language: &LangCode) -> Result<Option<String>, StoreError>;
}

/// [`PathLookup`] over the store's global (any-domain) lookup.
#[derive(Clone)]
pub struct StoreLookup {
    store: Arc<dyn AliasStore>,
}

impl StoreLookup {
    pub fn new(store: Arc<dyn AliasStore>) -> Self {
        Self { store }
    }
}

impl PathLookup for StoreLookup {
    fn lookup_path(&self, alias: &AliasPath, language: &LangCode) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .find_global(alias, language)?
            .map(|record| record.source.to_string()))
    }
}

/// Resolves aliases to source paths.
pub struct AliasResolver {
    store: Arc<dyn AliasStore>,
    inner: Box<dyn PathLookup>,
    languages: Box<dyn LanguageContext>,
    last_resolved: Mutex<Option<AliasRecord>>,
}

impl std::fmt::Debug for AliasResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliasResolver").finish_non_exhaustive()
    }
}

impl AliasResolver {
    /// A resolver falling back to the store's global lookup.
    pub fn new(store: Arc<dyn AliasStore>, languages: impl LanguageContext + 'static) -> Self {
        let inner = StoreLookup::new(Arc::clone(&store));
        Self::with_inner(store, inner, languages)
    }

    /// A resolver with a custom fallback lookup.
    pub fn with_inner(
        store: Arc<dyn AliasStore>,
        inner: impl PathLookup + 'static,
        languages: impl LanguageContext + 'static,
    ) -> Self {
        Self {
            store,
            inner: Box::new(inner),
            languages: Box::new(languages),
            last_resolved: Mutex::new(None),
        }
    }

    /// The source path `alias` stands for, or `alias` itself.
    ///
    /// # Errors
    ///
    /// Store failures propagate.
    pub fn resolve_alias_to_path(
        &self,
        alias: &str,
        language: Option<&LangCode>,
        tenant: &TenantContext,
    ) -> Result<String, ResolveError> {
        if is_asset_path(alias) {
            trace!(alias, "asset path, not resolving");
            return Ok(alias.to_string());
        }

        let language = match language {
            Some(lang) => lang.clone(),
            None => self.languages.current_language(),
        };

        let Ok(path) = AliasPath::new(alias) else {
            return Ok(alias.to_string());
        };

        if let Some(domain) = tenant.domain_id() {
            let scope = Scope::new(Some(domain.clone()), language.clone());
            if let Some(record) = self.store.find_by_scope(&path, &scope)? {
                debug!(alias, %scope, source = %record.source, "resolved in domain");
                let source = record.source.to_string();
                *self.cache() = Some(record);
                return Ok(source);
            }
        }

        match self.inner.lookup_path(&path, &language)? {
            Some(source) => {
                debug!(alias, %language, %source, "resolved by fallback lookup");
                Ok(source)
            }
            None => Ok(alias.to_string()),
        }
    }

    /// The record most recently resolved by the domain pass.
    pub fn last_resolved(&self) -> Option<AliasRecord> {
        self.cache().clone()
    }

    /// Forget the cached record.
    pub fn reset_cache(&self) {
        *self.cache() = None;
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, Option<AliasRecord>> {
        self.last_resolved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
