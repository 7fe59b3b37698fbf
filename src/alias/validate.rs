//! alias::validate
//!
//! Pre-save validation of manually entered aliases.
//!
//! Unlike generation, validation never renames: it reports the first
//! conflicting row as a [`Violation`] and leaves the decision to the caller.
//! Aliases are compared case-insensitively so `/Contact` and `/contact`
//! cannot coexist in one language.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::context::TenantContext;
use crate::core::types::{AliasDraft, AliasPath, DomainId};
use crate::store::{AliasStore, ConflictQuery, StoreError};

/// A reason an alias cannot be saved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("The alias {alias} is already in use in this domain ({domain}).")]
    DomainConflict { alias: AliasPath, domain: DomainId },

    #[error(
        "The alias {alias} could not be added because it is already in use in this language with different capitalization: {stored}."
    )]
    DifferentCapitalization { alias: AliasPath, stored: AliasPath },

    #[error("The alias {alias} is already in use in this language.")]
    InUse { alias: AliasPath },
}

/// Checks drafts against stored aliases.
#[derive(Clone)]
pub struct AliasValidator {
    store: Arc<dyn AliasStore>,
}

impl AliasValidator {
    pub fn new(store: Arc<dyn AliasStore>) -> Self {
        Self { store }
    }

    /// The violation `draft` would cause, if any.
    ///
    /// When the tenant yields a domain only that domain is searched.
    pub fn validate(
        &self,
        draft: &AliasDraft,
        tenant: &TenantContext,
    ) -> Result<Option<Violation>, StoreError> {
        let domain = tenant.domain_id().cloned();
        let query = ConflictQuery {
            alias: draft.alias.clone(),
            language: draft.language.clone(),
            domain: domain.clone(),
            exclude_id: draft.id,
            exclude_source: Some(draft.source.clone()),
        };

        let Some(existing) = self.store.find_conflict(&query)? else {
            return Ok(None);
        };
        debug!(alias = %draft.alias, conflicting = existing.id.0, "alias validation failed");

        let alias = draft.alias.clone();
        let violation = match domain {
            Some(domain) if existing.domain.as_ref() == Some(&domain) => {
                Violation::DomainConflict { alias, domain }
            }
            _ if existing.alias != alias => Violation::DifferentCapitalization {
                alias,
                stored: existing.alias,
            },
            _ => Violation::InUse { alias },
        };
        Ok(Some(violation))
    }
}
