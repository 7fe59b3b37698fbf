//! alias::context
//!
//! Request-scoped inputs: which tenant is active and which language is
//! current.
//!
//! # Example
//!
//! ```
//! use domain_alias::alias::context::{ContentDomains, TenantContext};
//! use domain_alias::core::types::DomainId;
//!
//! let active = DomainId::new("example_com").unwrap();
//! let content = ContentDomains::new(None, vec![DomainId::new("domain1_example_com").unwrap()]);
//!
//! let tenant = TenantContext::new(Some(active)).with_content(&content);
//! assert_eq!(tenant.domain_id().unwrap().as_str(), "domain1_example_com");
//! ```

use crate::core::types::{DomainId, LangCode};

/// The tenant a request runs under.
///
/// `override_domain` models a domain chosen explicitly for the content being
/// edited; it takes precedence over the negotiated active domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    pub active: Option<DomainId>,
    pub override_domain: Option<DomainId>,
}

impl TenantContext {
    pub fn new(active: Option<DomainId>) -> Self {
        Self {
            active,
            override_domain: None,
        }
    }

    /// No tenant at all; lookups use the global namespace.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, domain: Option<DomainId>) -> Self {
        self.override_domain = domain;
        self
    }

    /// Use the content's own domain assignment as the override, if it has one.
    pub fn with_content(self, content: &ContentDomains) -> Self {
        match content.primary() {
            Some(domain) => self.with_override(Some(domain.clone())),
            None => self,
        }
    }

    /// Effective domain: the override when present, else the active tenant.
    pub fn domain_id(&self) -> Option<&DomainId> {
        self.override_domain.as_ref().or(self.active.as_ref())
    }
}

/// Domain assignment carried by a piece of content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDomains {
    /// Canonical domain for the content.
    pub source: Option<DomainId>,
    /// Domains the content is published on, in field order.
    pub access: Vec<DomainId>,
}

impl ContentDomains {
    pub fn new(source: Option<DomainId>, access: Vec<DomainId>) -> Self {
        Self { source, access }
    }

    /// The source domain, else the first access domain.
    pub fn primary(&self) -> Option<&DomainId> {
        self.source.as_ref().or_else(|| self.access.first())
    }
}

/// Supplies the language to use when a caller gives none.
pub trait LanguageContext: Send + Sync {
    fn current_language(&self) -> LangCode;
}

/// A [`LanguageContext`] that always answers with the same code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLanguage(pub LangCode);

impl LanguageContext for FixedLanguage {
    fn current_language(&self) -> LangCode {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(id: &str) -> DomainId {
        DomainId::new(id).unwrap()
    }

    #[test]
    fn override_wins_over_active() {
        let tenant = TenantContext::new(Some(domain("a"))).with_override(Some(domain("b")));
        assert_eq!(tenant.domain_id(), Some(&domain("b")));
    }

    #[test]
    fn override_applies_without_active() {
        let tenant = TenantContext::global().with_override(Some(domain("b")));
        assert_eq!(tenant.domain_id(), Some(&domain("b")));
    }

    #[test]
    fn active_used_when_no_override() {
        let tenant = TenantContext::new(Some(domain("a")));
        assert_eq!(tenant.domain_id(), Some(&domain("a")));
        assert_eq!(TenantContext::global().domain_id(), None);
    }

    #[test]
    fn content_source_beats_access() {
        let content = ContentDomains::new(Some(domain("src")), vec![domain("x"), domain("y")]);
        assert_eq!(content.primary(), Some(&domain("src")));

        let content = ContentDomains::new(None, vec![domain("x"), domain("y")]);
        assert_eq!(content.primary(), Some(&domain("x")));

        assert_eq!(ContentDomains::default().primary(), None);
    }

    #[test]
    fn empty_content_keeps_tenant() {
        let tenant = TenantContext::new(Some(domain("a"))).with_content(&ContentDomains::default());
        assert_eq!(tenant.domain_id(), Some(&domain("a")));
    }

    #[test]
    fn fixed_language() {
        let lang = FixedLanguage(LangCode::new("fr").unwrap());
        assert_eq!(lang.current_language().as_str(), "fr");
    }
}
