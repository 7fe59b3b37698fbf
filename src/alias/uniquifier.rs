//! alias::uniquifier
//!
//! Reservation checks and unique-variant derivation within a scope.
//!
//! # Reservation
//!
//! A candidate alias is reserved when, in order:
//!
//! 1. another source already holds it in the (domain, language) scope, or in
//!    the global namespace when no domain is given
//! 2. a static route serves the same path
//! 3. a [`ReservationExtension`] vetoes it (first veto wins)
//!
//! A record for the same source does not reserve the alias; the route and
//! extension checks still run.
//!
//! # Variants
//!
//! A reserved alias gets `separator + i` appended for `i = 0, 1, ...`, with
//! the base truncated word-safe so the result never exceeds the maximum
//! length. The search is bounded by `max_attempts`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use domain_alias::alias::uniquifier::{AliasUniquifier, UniquifySettings};
//! use domain_alias::core::types::{AliasDraft, AliasPath, DomainId, LangCode, SourcePath};
//! use domain_alias::store::{AliasStore, MemoryAliasStore};
//!
//! let en = LangCode::new("en").unwrap();
//! let domain = DomainId::new("example_com").unwrap();
//! let store = Arc::new(MemoryAliasStore::new());
//! store
//!     .save(AliasDraft::new(
//!         SourcePath::new("/node/1").unwrap(),
//!         AliasPath::new("/contact").unwrap(),
//!         en.clone(),
//!         Some(domain.clone()),
//!     ))
//!     .unwrap();
//!
//! let uniquifier = AliasUniquifier::new(store, UniquifySettings::default());
//! let alias = uniquifier
//!     .uniquify(
//!         &AliasPath::new("/contact").unwrap(),
//!         &SourcePath::new("/node/2").unwrap(),
//!         &en,
//!         Some(&domain),
//!     )
//!     .unwrap();
//! assert_eq!(alias.as_str(), "/contact-0");
//! ```

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};

use super::reservation::{ReservationExtension, RouteChecker, RouteSet};
use crate::core::config::{Config, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_LENGTH, DEFAULT_SEPARATOR};
use crate::core::naming::{suffixed, truncate_wordsafe};
use crate::core::types::{AliasPath, DomainId, LangCode, Scope, SourcePath, TypeError};
use crate::store::{AliasStore, StoreError};

/// Errors from unique-variant derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UniquifyError {
    /// The store could not answer; the alias is not assumed free.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Truncation left nothing of the alias.
    #[error("alias '{alias}' cannot be shortened to fit {max_length} characters")]
    EmptyAlias { alias: String, max_length: usize },

    /// Every suffix tried was reserved.
    #[error("no unique variant of '{alias}' found after {attempts} attempts")]
    Exhausted { alias: AliasPath, attempts: u32 },

    /// A derived variant is not a valid alias path.
    #[error("invalid alias variant: {0}")]
    Invalid(#[from] TypeError),
}

/// Length and suffix parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniquifySettings {
    /// Effective maximum alias length in characters.
    pub max_length: usize,
    pub separator: String,
    pub max_attempts: u32,
}

impl Default for UniquifySettings {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            separator: DEFAULT_SEPARATOR.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl UniquifySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_length: config.max_length(),
            separator: config.separator(),
            max_attempts: config.max_attempts(),
        }
    }
}

/// Outcome of [`AliasUniquifier::uniquify_from`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uniquified {
    pub alias: AliasPath,
    /// Counter of the suffix appended, `None` if the alias was free as given.
    pub suffix: Option<u32>,
}

/// Decides reservation and derives unique aliases.
pub struct AliasUniquifier {
    store: Arc<dyn AliasStore>,
    routes: Box<dyn RouteChecker>,
    extensions: Vec<Box<dyn ReservationExtension>>,
    settings: UniquifySettings,
}

impl std::fmt::Debug for AliasUniquifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliasUniquifier")
            .field("settings", &self.settings)
            .field(
                "extensions",
                &self.extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl AliasUniquifier {
    /// A uniquifier with no routes and no extensions.
    pub fn new(store: Arc<dyn AliasStore>, settings: UniquifySettings) -> Self {
        Self {
            store,
            routes: Box::new(RouteSet::new()),
            extensions: Vec::new(),
            settings,
        }
    }

    pub fn with_routes(mut self, routes: impl RouteChecker + 'static) -> Self {
        self.routes = Box::new(routes);
        self
    }

    /// Register an extension. Extensions are consulted in registration order.
    pub fn with_extension(mut self, extension: impl ReservationExtension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn settings(&self) -> &UniquifySettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn AliasStore> {
        &self.store
    }

    /// Whether `alias` is unavailable to `source` in the scope.
    ///
    /// # Errors
    ///
    /// Store failures propagate; they never read as "not reserved".
    pub fn is_reserved(
        &self,
        alias: &AliasPath,
        source: &SourcePath,
        language: &LangCode,
        domain: Option<&DomainId>,
    ) -> Result<bool, StoreError> {
        // The exact scope row always counts; without a domain the global
        // row counts too.
        let scoped = self
            .store
            .find_by_scope(alias, &Scope::new(domain.cloned(), language.clone()))?;
        let global = match domain {
            Some(_) => None,
            None => self.store.find_global(alias, language)?,
        };

        for record in scoped.iter().chain(global.iter()) {
            // A row mapping the path to itself does not hold the alias
            if record.source.as_str() != alias.as_str() && &record.source != source {
                debug!(%alias, holder = %record.source, domain = ?domain.map(DomainId::as_str), "alias held by another source");
                return Ok(true);
            }
        }

        if self.routes.is_static_route(alias.as_str()) {
            debug!(%alias, "alias collides with a static route");
            return Ok(true);
        }

        for extension in &self.extensions {
            if extension.is_alias_reserved(alias, source, language) {
                debug!(%alias, extension = extension.name(), "alias reserved by extension");
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// A variant of `alias` that is not reserved for `source`.
    pub fn uniquify(
        &self,
        alias: &AliasPath,
        source: &SourcePath,
        language: &LangCode,
        domain: Option<&DomainId>,
    ) -> Result<AliasPath, UniquifyError> {
        self.uniquify_from(alias, source, language, domain, 0)
            .map(|u| u.alias)
    }

    /// Like [`uniquify`](Self::uniquify) with the suffix counter starting at
    /// `start`. The returned suffix lets a caller resume after a collision
    /// at save time.
    pub fn uniquify_from(
        &self,
        alias: &AliasPath,
        source: &SourcePath,
        language: &LangCode,
        domain: Option<&DomainId>,
        start: u32,
    ) -> Result<Uniquified, UniquifyError> {
        let original = self.fit(alias)?;

        if !self.is_reserved(&original, source, language, domain)? {
            return Ok(Uniquified {
                alias: original,
                suffix: None,
            });
        }

        self.suffix_from(&original, source, language, domain, start)
    }

    /// The first free suffixed variant of `alias`, counting from `start`.
    ///
    /// Unlike [`uniquify_from`](Self::uniquify_from) the unchanged alias is
    /// never returned. Used after the store rejected a save the reservation
    /// check had allowed.
    pub fn suffix_from(
        &self,
        alias: &AliasPath,
        source: &SourcePath,
        language: &LangCode,
        domain: Option<&DomainId>,
        start: u32,
    ) -> Result<Uniquified, UniquifyError> {
        let max_length = self.settings.max_length;
        let original = self.fit(alias)?;

        let end = start.saturating_add(self.settings.max_attempts);
        for counter in start..end {
            let candidate = suffixed(original.as_str(), &self.settings.separator, counter, max_length)
                .ok_or_else(|| UniquifyError::EmptyAlias {
                    alias: original.to_string(),
                    max_length,
                })?;
            let candidate = AliasPath::new(candidate)?;
            trace!(%candidate, counter, "trying alias variant");

            if !self.is_reserved(&candidate, source, language, domain)? {
                return Ok(Uniquified {
                    alias: candidate,
                    suffix: Some(counter),
                });
            }
        }

        Err(UniquifyError::Exhausted {
            alias: original,
            attempts: end - start,
        })
    }

    /// Truncate an overlong alias to the maximum length.
    fn fit(&self, alias: &AliasPath) -> Result<AliasPath, UniquifyError> {
        let max_length = self.settings.max_length;
        if alias.char_len() <= max_length {
            return Ok(alias.clone());
        }

        let truncated = truncate_wordsafe(alias.as_str(), max_length);
        if truncated.is_empty() {
            return Err(UniquifyError::EmptyAlias {
                alias: alias.to_string(),
                max_length,
            });
        }
        Ok(AliasPath::new(truncated)?)
    }
}
