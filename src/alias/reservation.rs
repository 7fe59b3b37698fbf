//! alias::reservation
//!
//! Reasons other than an existing alias record why a path cannot be used.
//!
//! # Architecture
//!
//! - [`RouteChecker`] answers whether a path is already served by a static
//!   route (a system page, a file under the document root).
//! - [`ReservationExtension`] lets callers veto aliases by policy. The
//!   uniquifier consults extensions in registration order and stops at the
//!   first veto.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::core::types::{AliasPath, LangCode, SourcePath};

/// Reports whether a path collides with a statically routed path.
pub trait RouteChecker: Send + Sync {
    fn is_static_route(&self, path: &str) -> bool;
}

/// Exact-match set of route paths.
#[derive(Debug, Clone, Default)]
pub struct StaticRoutes {
    routes: BTreeSet<String>,
}

impl StaticRoutes {
    pub fn new<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            routes: routes
                .into_iter()
                .map(|r| normalize_route(r.as_ref()))
                .filter(|r| r != "/")
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn normalize_route(route: &str) -> String {
    let trimmed = route.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

impl RouteChecker for StaticRoutes {
    fn is_static_route(&self, path: &str) -> bool {
        self.routes.contains(&normalize_route(path))
    }
}

/// Treats any existing file or directory under a document root as routed.
#[derive(Debug, Clone)]
pub struct FilesystemRoutes {
    root: PathBuf,
}

impl FilesystemRoutes {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a URL path onto the document root. Paths that climb out of the
    /// root map to nothing.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return None;
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl RouteChecker for FilesystemRoutes {
    fn is_static_route(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.exists())
    }
}

/// A path is routed if any member checker says so.
#[derive(Default)]
pub struct RouteSet {
    checkers: Vec<Box<dyn RouteChecker>>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, checker: impl RouteChecker + 'static) -> Self {
        self.checkers.push(Box::new(checker));
        self
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}

impl std::fmt::Debug for RouteSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteSet")
            .field("checkers", &self.checkers.len())
            .finish()
    }
}

impl RouteChecker for RouteSet {
    fn is_static_route(&self, path: &str) -> bool {
        self.checkers.iter().any(|c| c.is_static_route(path))
    }
}

/// Policy hook that can veto an alias.
pub trait ReservationExtension: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn is_alias_reserved(&self, alias: &AliasPath, source: &SourcePath, language: &LangCode)
        -> bool;
}

/// Reserves a set of path prefixes, e.g. `/admin` reserves `/admin` and
/// `/admin/anything` but not `/administrators`.
#[derive(Debug, Clone, Default)]
pub struct PrefixReservation {
    prefixes: Vec<String>,
}

impl PrefixReservation {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| normalize_route(p.as_ref()))
                .filter(|p| p != "/")
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl ReservationExtension for PrefixReservation {
    fn name(&self) -> &str {
        "prefix"
    }

    fn is_alias_reserved(&self, alias: &AliasPath, _source: &SourcePath, _language: &LangCode) -> bool {
        let alias = alias.as_str();
        self.prefixes.iter().any(|prefix| {
            alias
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn alias(a: &str) -> AliasPath {
        AliasPath::new(a).unwrap()
    }

    fn source() -> SourcePath {
        SourcePath::new("/node/1").unwrap()
    }

    fn en() -> LangCode {
        LangCode::new("en").unwrap()
    }

    #[test]
    fn static_routes_match_exactly() {
        let routes = StaticRoutes::new(["/user/login", "admin/", "/"]);
        assert!(routes.is_static_route("/user/login"));
        assert!(routes.is_static_route("/admin"));
        assert!(routes.is_static_route("/admin/"));
        assert!(!routes.is_static_route("/user"));
        assert!(!routes.is_static_route("/"));
    }

    #[test]
    fn filesystem_routes_check_document_root() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("core/misc")).unwrap();
        std::fs::write(temp.path().join("robots.txt"), "").unwrap();

        let routes = FilesystemRoutes::new(temp.path());
        assert!(routes.is_static_route("/robots.txt"));
        assert!(routes.is_static_route("/core/misc"));
        assert!(!routes.is_static_route("/contact"));
        assert!(!routes.is_static_route("/"));
        assert!(!routes.is_static_route("/../etc"));
    }

    #[test]
    fn route_set_is_any_of() {
        let set = RouteSet::new()
            .with(StaticRoutes::new(["/a"]))
            .with(StaticRoutes::new(["/b"]));
        assert_eq!(set.len(), 2);
        assert!(set.is_static_route("/a"));
        assert!(set.is_static_route("/b"));
        assert!(!set.is_static_route("/c"));
        assert!(!RouteSet::new().is_static_route("/a"));
    }

    #[test]
    fn prefix_reservation_respects_segments() {
        let ext = PrefixReservation::new(["/admin", "system"]);
        assert!(ext.is_alias_reserved(&alias("/admin"), &source(), &en()));
        assert!(ext.is_alias_reserved(&alias("/admin/people"), &source(), &en()));
        assert!(ext.is_alias_reserved(&alias("/system/files"), &source(), &en()));
        assert!(!ext.is_alias_reserved(&alias("/administrators"), &source(), &en()));
        assert!(!ext.is_alias_reserved(&alias("/contact"), &source(), &en()));
    }
}
