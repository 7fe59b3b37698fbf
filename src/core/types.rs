//! core::types
//!
//! Strong types for alias domain concepts.
//!
//! # Types
//!
//! - [`AliasPath`] - Human-readable URL path (e.g. `/contact`)
//! - [`SourcePath`] - Canonical system path (e.g. `/node/1`)
//! - [`LangCode`] - Language tag
//! - [`DomainId`] - Tenant/domain machine name
//! - [`Scope`] - The (domain, language) pair uniqueness is enforced within
//! - [`AliasRecord`] / [`AliasDraft`] - Persisted and pending alias rows
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use domain_alias::core::types::{AliasPath, DomainId, LangCode, Scope};
//!
//! let alias = AliasPath::new("/contact").unwrap();
//! let scope = Scope::new(Some(DomainId::new("example_com").unwrap()), LangCode::new("en").unwrap());
//! assert_eq!(scope.to_string(), "example_com:en");
//!
//! assert!(AliasPath::new("contact").is_err());
//! assert!(DomainId::new("Example.com").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid alias path: {0}")]
    InvalidAlias(String),

    #[error("invalid source path: {0}")]
    InvalidSource(String),

    #[error("invalid language code: {0}")]
    InvalidLangCode(String),

    #[error("invalid domain id: {0}")]
    InvalidDomainId(String),
}

/// Shared rules for alias and source paths.
fn check_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("path cannot be empty".into());
    }
    if !path.starts_with('/') {
        return Err(format!("path '{path}' must start with '/'"));
    }
    if path.chars().any(|c| c.is_control()) {
        return Err("path cannot contain control characters".into());
    }
    Ok(())
}

/// A validated, human-readable URL alias.
///
/// Aliases must be non-empty, start with `/` and contain no control
/// characters. Length limits are enforced by the uniquifier, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AliasPath(String);

impl AliasPath {
    /// Create a new validated alias.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidAlias` if the path is empty, relative, or
    /// contains control characters.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        check_path(&path).map_err(TypeError::InvalidAlias)?;
        Ok(Self(path))
    }

    /// Get the alias as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Case-insensitive comparison, as used by the save-time validator.
    pub fn eq_ignore_case(&self, other: &AliasPath) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl TryFrom<String> for AliasPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AliasPath> for String {
    fn from(alias: AliasPath) -> Self {
        alias.0
    }
}

impl AsRef<str> for AliasPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AliasPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated canonical source path such as `/node/1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourcePath(String);

impl SourcePath {
    /// Create a new validated source path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSource` under the same rules as [`AliasPath`].
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        check_path(&path).map_err(TypeError::InvalidSource)?;
        Ok(Self(path))
    }

    /// Get the source path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourcePath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SourcePath> for String {
    fn from(source: SourcePath) -> Self {
        source.0
    }
}

impl AsRef<str> for SourcePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A language tag such as `en`, `pt-br`, or the special `und` / `zxx` codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LangCode(String);

impl LangCode {
    /// Language not specified.
    pub const NOT_SPECIFIED: &'static str = "und";

    /// Language not applicable.
    pub const NOT_APPLICABLE: &'static str = "zxx";

    /// Create a new validated language code.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLangCode` if empty or if it contains
    /// anything other than ASCII alphanumerics, `-` and `_`.
    pub fn new(code: impl Into<String>) -> Result<Self, TypeError> {
        let code = code.into();
        if code.is_empty() {
            return Err(TypeError::InvalidLangCode(
                "language code cannot be empty".into(),
            ));
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TypeError::InvalidLangCode(format!(
                "'{code}' contains invalid characters"
            )));
        }
        Ok(Self(code))
    }

    /// Wrap a compile-time code known to be valid.
    pub(crate) fn from_static(code: &'static str) -> Self {
        debug_assert!(Self::new(code).is_ok());
        Self(code.to_string())
    }

    /// The `und` code.
    pub fn not_specified() -> Self {
        Self(Self::NOT_SPECIFIED.to_string())
    }

    /// Whether this is the `und` code.
    pub fn is_not_specified(&self) -> bool {
        self.0 == Self::NOT_SPECIFIED
    }

    /// Map `zxx` to `und`; aliases are never stored as "not applicable".
    pub fn normalized(self) -> Self {
        if self.0 == Self::NOT_APPLICABLE {
            Self::not_specified()
        } else {
            self
        }
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LangCode {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LangCode> for String {
    fn from(code: LangCode) -> Self {
        code.0
    }
}

impl AsRef<str> for LangCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LangCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tenant/domain machine name such as `example_com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainId(String);

impl DomainId {
    /// Create a new validated domain id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidDomainId` unless the id is a non-empty
    /// machine name made of `[a-z0-9_]`.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidDomainId(
                "domain id cannot be empty".into(),
            ));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(TypeError::InvalidDomainId(format!(
                "'{id}' must be a machine name ([a-z0-9_])"
            )));
        }
        Ok(Self(id))
    }

    /// Parse an optional raw value, treating empty input as "no domain".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, TypeError> {
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => Self::new(s.trim()).map(Some),
        }
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DomainId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DomainId> for String {
    fn from(id: DomainId) -> Self {
        id.0
    }
}

impl AsRef<str> for DomainId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (domain, language) namespace an alias must be unique within.
///
/// A `None` domain is the global namespace shared by unscoped aliases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub domain: Option<DomainId>,
    pub language: LangCode,
}

impl Scope {
    pub fn new(domain: Option<DomainId>, language: LangCode) -> Self {
        Self { domain, language }
    }

    /// Stable key used to name per-scope lock files.
    pub fn key(&self) -> String {
        format!(
            "{}\u{1f}{}",
            self.domain.as_ref().map(DomainId::as_str).unwrap_or(""),
            self.language
        )
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.domain {
            Some(domain) => write!(f, "{}:{}", domain, self.language),
            None => write!(f, "*:{}", self.language),
        }
    }
}

/// Identifier of a persisted alias row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasId(pub u64);

impl std::fmt::Display for AliasId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub id: AliasId,
    pub source: SourcePath,
    pub alias: AliasPath,
    pub language: LangCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainId>,
}

impl AliasRecord {
    /// The scope this record occupies.
    pub fn scope(&self) -> Scope {
        Scope::new(self.domain.clone(), self.language.clone())
    }
}

/// An alias about to be saved.
///
/// `id` is `None` for a new row and `Some` when updating an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDraft {
    pub id: Option<AliasId>,
    pub source: SourcePath,
    pub alias: AliasPath,
    pub language: LangCode,
    pub domain: Option<DomainId>,
}

impl AliasDraft {
    pub fn new(
        source: SourcePath,
        alias: AliasPath,
        language: LangCode,
        domain: Option<DomainId>,
    ) -> Self {
        Self {
            id: None,
            source,
            alias,
            language,
            domain,
        }
    }

    /// Target an existing row instead of inserting.
    pub fn with_id(mut self, id: AliasId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn scope(&self) -> Scope {
        Scope::new(self.domain.clone(), self.language.clone())
    }

    /// Build the record this draft becomes once stored under `id`.
    pub fn into_record(self, id: AliasId) -> AliasRecord {
        AliasRecord {
            id,
            source: self.source,
            alias: self.alias,
            language: self.language,
            domain: self.domain,
        }
    }
}
