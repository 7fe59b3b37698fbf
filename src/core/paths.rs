//! core::paths
//!
//! Centralized path routing for site-local storage.
//!
//! # Storage Layout
//!
//! All site data lives under `<site_root>/.dalias/`:
//! - `config.toml` - Site configuration
//! - `aliases.json` - Default alias store
//! - `locks/` - Per-scope advisory lock files
//!
//! # Example
//!
//! ```
//! use domain_alias::core::paths::SitePaths;
//! use std::path::PathBuf;
//!
//! let paths = SitePaths::new(PathBuf::from("/srv/site"));
//! assert_eq!(paths.config_path(), PathBuf::from("/srv/site/.dalias/config.toml"));
//! assert_eq!(paths.default_store_path(), PathBuf::from("/srv/site/.dalias/aliases.json"));
//! ```

use std::path::{Path, PathBuf};

/// Name of the site-local data directory.
pub const DATA_DIR: &str = ".dalias";

/// Centralized path routing for a site.
///
/// No code outside this module should compute `*.join(".dalias")` paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    /// The site root directory.
    pub root: PathBuf,
}

impl SitePaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `<root>/.dalias`
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// Canonical site config location.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir().join("config.toml")
    }

    /// Where the JSON alias store lives unless configured otherwise.
    pub fn default_store_path(&self) -> PathBuf {
        self.data_dir().join("aliases.json")
    }

    /// Directory holding per-scope lock files.
    pub fn default_lock_dir(&self) -> PathBuf {
        self.data_dir().join("locks")
    }

    /// Resolve a configured path relative to the site root.
    pub fn resolve(&self, configured: &Path) -> PathBuf {
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            self.root.join(configured)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let paths = SitePaths::new(PathBuf::from("/srv/site"));
        assert_eq!(paths.data_dir(), PathBuf::from("/srv/site/.dalias"));
        assert_eq!(
            paths.config_path(),
            PathBuf::from("/srv/site/.dalias/config.toml")
        );
        assert_eq!(
            paths.default_lock_dir(),
            PathBuf::from("/srv/site/.dalias/locks")
        );
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let paths = SitePaths::new(PathBuf::from("/srv/site"));
        assert_eq!(
            paths.resolve(Path::new("data/aliases.json")),
            PathBuf::from("/srv/site/data/aliases.json")
        );
        assert_eq!(
            paths.resolve(Path::new("/var/aliases.json")),
            PathBuf::from("/var/aliases.json")
        );
    }
}
