//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! There are two configuration scopes:
//! - **Global**: User-level settings
//! - **Site**: Per-site overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Site config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$DALIAS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/dalias/config.toml`
//! 3. `~/.dalias/config.toml` (canonical write location)
//!
//! # Site Config Locations
//!
//! Only `<site>/.dalias/config.toml` is read.
//!
//! # Example
//!
//! ```no_run
//! use domain_alias::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/srv/site"))).unwrap();
//!
//! println!("Separator: {}", config.separator());
//! println!("Max length: {}", config.max_length());
//! ```

pub mod schema;

pub use schema::{AliasSettings, GlobalConfig, SiteConfig, UpdateAction};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths::SitePaths;
use crate::core::types::LangCode;

/// Default configured maximum alias length.
pub const DEFAULT_MAX_LENGTH: usize = 100;

/// Default storage column limit.
pub const DEFAULT_SCHEMA_MAX_LENGTH: usize = 255;

/// Default separator placed before numeric suffixes.
pub const DEFAULT_SEPARATOR: &str = "-";

/// Default bound on suffix attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Default language when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules automatically: site config
/// overrides global config, which overrides the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Site configuration (if a site directory was given)
    pub site: Option<SiteConfig>,
    /// Site paths (if a site directory was given)
    site_paths: Option<SitePaths>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the site config file (if loaded)
    site_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `site_root` is provided, also loads site-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or fail
    /// validation. Missing config files are not an error.
    pub fn load(site_root: Option<&Path>) -> Result<Config, ConfigError> {
        let (global, global_path) = Self::load_global()?;
        Self::assemble(global, global_path, site_root)
    }

    /// Load configuration using an explicit global config file.
    ///
    /// A missing file is treated like an absent global config.
    pub fn load_with_global(
        global_file: &Path,
        site_root: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        let (global, global_path) = if global_file.exists() {
            (
                Self::read_toml::<GlobalConfig>(global_file)?,
                Some(global_file.to_path_buf()),
            )
        } else {
            (GlobalConfig::default(), None)
        };
        Self::assemble(global, global_path, site_root)
    }

    fn assemble(
        global: GlobalConfig,
        global_path: Option<PathBuf>,
        site_root: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        let site_paths = site_root.map(|root| SitePaths::new(root.to_path_buf()));
        let (site, site_path) = match &site_paths {
            Some(paths) => Self::load_site(paths)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref s) = site {
            s.validate()?;
        }

        Ok(Config {
            global,
            site,
            site_paths,
            global_path,
            site_path,
        })
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $DALIAS_CONFIG
        if let Ok(path) = std::env::var("DALIAS_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/dalias/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("dalias/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.dalias/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".dalias/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    /// Load site configuration from `<site>/.dalias/config.toml`.
    fn load_site(
        paths: &SitePaths,
    ) -> Result<(Option<SiteConfig>, Option<PathBuf>), ConfigError> {
        let path = paths.config_path();
        if !path.exists() {
            return Ok((None, None));
        }
        let config = Self::read_toml(&path)?;
        Ok((Some(config), Some(path)))
    }

    /// Read and parse a TOML config file.
    fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write site config atomically.
    ///
    /// Creates parent directories if needed.
    pub fn write_site(site_root: &Path, config: &SiteConfig) -> Result<PathBuf, ConfigError> {
        let path = SitePaths::new(site_root.to_path_buf()).config_path();
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically (temp file, then rename).
    fn write_config_atomic<T: serde::Serialize>(
        path: &Path,
        config: &T,
    ) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Look up an alias setting, site first, then global.
    fn alias_setting<T>(&self, pick: impl Fn(&AliasSettings) -> Option<T>) -> Option<T> {
        self.site
            .as_ref()
            .and_then(|s| s.alias.as_ref())
            .and_then(&pick)
            .or_else(|| self.global.alias.as_ref().and_then(&pick))
    }

    /// Effective maximum alias length.
    ///
    /// The smaller of the configured maximum and the storage column limit.
    pub fn max_length(&self) -> usize {
        let configured = self
            .alias_setting(|a| a.max_length)
            .unwrap_or(DEFAULT_MAX_LENGTH);
        configured.min(self.schema_max_length())
    }

    /// Storage column limit. Defaults to 255.
    pub fn schema_max_length(&self) -> usize {
        self.alias_setting(|a| a.schema_max_length)
            .unwrap_or(DEFAULT_SCHEMA_MAX_LENGTH)
    }

    /// Suffix separator. Defaults to `-`.
    pub fn separator(&self) -> String {
        self.alias_setting(|a| a.separator.clone())
            .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string())
    }

    /// Update action. Defaults to [`UpdateAction::Replace`].
    pub fn update_action(&self) -> UpdateAction {
        self.alias_setting(|a| a.update_action).unwrap_or_default()
    }

    /// Bound on suffix attempts. Defaults to 1000.
    pub fn max_attempts(&self) -> u32 {
        self.alias_setting(|a| a.max_attempts)
            .unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    /// Default language, site first, then global, then `en`.
    pub fn default_language(&self) -> LangCode {
        self.site
            .as_ref()
            .and_then(|s| s.default_language.as_deref())
            .or(self.global.default_language.as_deref())
            .and_then(|code| LangCode::new(code).ok())
            .unwrap_or_else(|| LangCode::from_static(DEFAULT_LANGUAGE))
    }

    /// Configured log level, if any.
    pub fn log_level(&self) -> Option<&str> {
        self.global.log_level.as_deref()
    }

    /// Reserved route paths.
    pub fn reserved_routes(&self) -> &[String] {
        self.site
            .as_ref()
            .and_then(|s| s.reserved_routes.as_deref())
            .unwrap_or(&[])
    }

    /// Reserved path prefixes.
    pub fn reserved_prefixes(&self) -> &[String] {
        self.site
            .as_ref()
            .and_then(|s| s.reserved_prefixes.as_deref())
            .unwrap_or(&[])
    }

    /// Resolved path to the alias store file, if a site is known.
    pub fn store_path(&self) -> Option<PathBuf> {
        let paths = self.site_paths.as_ref()?;
        Some(
            self.site
                .as_ref()
                .and_then(|s| s.store.as_deref())
                .map(|p| paths.resolve(p))
                .unwrap_or_else(|| paths.default_store_path()),
        )
    }

    /// Resolved lock directory, if a site is known.
    pub fn lock_dir(&self) -> Option<PathBuf> {
        let paths = self.site_paths.as_ref()?;
        Some(
            self.site
                .as_ref()
                .and_then(|s| s.lock_dir.as_deref())
                .map(|p| paths.resolve(p))
                .unwrap_or_else(|| paths.default_lock_dir()),
        )
    }

    /// Resolved document root, if configured.
    pub fn document_root(&self) -> Option<PathBuf> {
        let paths = self.site_paths.as_ref()?;
        self.site
            .as_ref()
            .and_then(|s| s.document_root.as_deref())
            .map(|p| paths.resolve(p))
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded site config file.
    pub fn site_config_loaded_from(&self) -> Option<&Path> {
        self.site_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn missing_global(temp: &TempDir) -> PathBuf {
        temp.path().join("no-such-global.toml")
    }

    #[test]
    fn load_empty_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_with_global(&missing_global(&temp), None).unwrap();

        assert_eq!(config.max_length(), DEFAULT_MAX_LENGTH);
        assert_eq!(config.schema_max_length(), DEFAULT_SCHEMA_MAX_LENGTH);
        assert_eq!(config.separator(), "-");
        assert_eq!(config.update_action(), UpdateAction::Replace);
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.default_language().as_str(), "en");
        assert!(config.store_path().is_none());
        assert!(config.global_config_loaded_from().is_none());
    }

    #[test]
    fn load_global_file() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
            default_language = "fr"

            [alias]
            separator = "_"
            "#,
        )
        .unwrap();

        let config = Config::load_with_global(&global, None).unwrap();
        assert_eq!(config.separator(), "_");
        assert_eq!(config.default_language().as_str(), "fr");
        assert_eq!(config.global_config_loaded_from(), Some(global.as_path()));
    }

    #[test]
    fn site_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
            [alias]
            separator = "_"
            max_length = 50
            "#,
        )
        .unwrap();

        let site = temp.path().join("site");
        fs::create_dir_all(site.join(".dalias")).unwrap();
        fs::write(
            site.join(".dalias/config.toml"),
            r#"
            [alias]
            max_length = 80
            "#,
        )
        .unwrap();

        let config = Config::load_with_global(&global, Some(&site)).unwrap();
        assert_eq!(config.max_length(), 80);
        // Not overridden by the site, so the global value stands
        assert_eq!(config.separator(), "_");
    }

    #[test]
    fn max_length_capped_by_schema() {
        let config = Config {
            site: Some(SiteConfig {
                alias: Some(AliasSettings {
                    max_length: Some(500),
                    schema_max_length: Some(255),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(config.max_length(), 255);
    }

    #[test]
    fn store_path_defaults_under_site() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_with_global(&missing_global(&temp), Some(temp.path()))
            .unwrap();
        assert_eq!(
            config.store_path(),
            Some(temp.path().join(".dalias/aliases.json"))
        );
        assert_eq!(config.lock_dir(), Some(temp.path().join(".dalias/locks")));
    }

    #[test]
    fn store_path_resolved_relative_to_site() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".dalias")).unwrap();
        fs::write(
            temp.path().join(".dalias/config.toml"),
            "store = \"data/aliases.json\"\ndocument_root = \"web\"",
        )
        .unwrap();

        let config = Config::load_with_global(&missing_global(&temp), Some(temp.path()))
            .unwrap();
        assert_eq!(
            config.store_path(),
            Some(temp.path().join("data/aliases.json"))
        );
        assert_eq!(config.document_root(), Some(temp.path().join("web")));
    }

    #[test]
    fn root_level_toml_is_not_site_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dalias.toml"), "default_language = \"de\"").unwrap();

        let config = Config::load_with_global(&missing_global(&temp), Some(temp.path())).unwrap();
        assert_eq!(config.default_language().as_str(), "en");
        assert!(config.site_config_loaded_from().is_none());
    }

    #[test]
    fn write_site_config_atomic() {
        let temp = TempDir::new().unwrap();

        let config = SiteConfig {
            reserved_routes: Some(vec!["/admin".to_string()]),
            ..Default::default()
        };

        let path = Config::write_site(temp.path(), &config).unwrap();
        assert!(path.exists());

        let loaded = Config::load_with_global(&missing_global(&temp), Some(temp.path()))
            .unwrap();
        assert_eq!(loaded.reserved_routes(), ["/admin".to_string()]);
    }

    #[test]
    fn invalid_site_value_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".dalias")).unwrap();
        fs::write(
            temp.path().join(".dalias/config.toml"),
            "[alias]\nseparator = \"/\"",
        )
        .unwrap();

        let result = Config::load_with_global(&missing_global(&temp), Some(temp.path()));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".dalias")).unwrap();
        fs::write(
            temp.path().join(".dalias/config.toml"),
            "unknown_field = true",
        )
        .unwrap();

        let result = Config::load_with_global(&missing_global(&temp), Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
