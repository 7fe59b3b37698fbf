//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$DALIAS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/dalias/config.toml`
//! 3. `~/.dalias/config.toml` (canonical write location)
//!
//! # Site Config
//!
//! Located at `<site>/.dalias/config.toml` (canonical).
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., the separator cannot contain `/`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{AliasPath, LangCode};

/// What generation does when the source already has an alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateAction {
    /// Keep the existing alias; generate nothing.
    NoNew,
    /// Create a new alias and leave the old one in place.
    Leave,
    /// Overwrite the existing alias in place.
    #[default]
    Replace,
}

impl UpdateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateAction::NoNew => "no-new",
            UpdateAction::Leave => "leave",
            UpdateAction::Replace => "replace",
        }
    }
}

impl std::str::FromStr for UpdateAction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no-new" => Ok(UpdateAction::NoNew),
            "leave" => Ok(UpdateAction::Leave),
            "replace" => Ok(UpdateAction::Replace),
            other => Err(ConfigError::InvalidValue(format!(
                "invalid update action '{}', must be one of: no-new, leave, replace",
                other
            ))),
        }
    }
}

/// Alias generation settings, valid in both global and site files.
///
/// # Example
///
/// ```toml
/// [alias]
/// max_length = 100
/// schema_max_length = 255
/// separator = "-"
/// update_action = "replace"
/// max_attempts = 1000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AliasSettings {
    /// Configured maximum alias length, in characters
    pub max_length: Option<usize>,

    /// Storage column limit, in characters
    pub schema_max_length: Option<usize>,

    /// Separator placed before the numeric suffix
    pub separator: Option<String>,

    /// Behaviour when regenerating an alias for an aliased source
    pub update_action: Option<UpdateAction>,

    /// Upper bound on suffix attempts
    pub max_attempts: Option<u32>,
}

impl AliasSettings {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_length == Some(0) {
            return Err(ConfigError::InvalidValue(
                "max_length must be greater than zero".to_string(),
            ));
        }
        if self.schema_max_length == Some(0) {
            return Err(ConfigError::InvalidValue(
                "schema_max_length must be greater than zero".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue(
                "max_attempts must be greater than zero".to_string(),
            ));
        }
        if let Some(separator) = &self.separator {
            if separator.contains('/') || separator.chars().any(|c| c.is_control()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid separator '{}': cannot contain '/' or control characters",
                    separator.escape_debug()
                )));
            }
        }
        Ok(())
    }
}

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// default_language = "en"
/// log_level = "info"
///
/// [alias]
/// separator = "-"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Language used when a caller supplies none
    pub default_language: Option<String>,

    /// Default log level (error, warn, info, debug)
    pub log_level: Option<String>,

    /// Alias generation defaults
    pub alias: Option<AliasSettings>,
}

impl GlobalConfig {
    /// Valid log levels.
    pub const VALID_LOG_LEVELS: &'static [&'static str] = &["off", "error", "warn", "info", "debug"];

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(language) = &self.default_language {
            LangCode::new(language.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid default_language: {}", e))
            })?;
        }

        if let Some(level) = &self.log_level {
            if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log level '{}', must be one of: {}",
                    level,
                    Self::VALID_LOG_LEVELS.join(", ")
                )));
            }
        }

        if let Some(alias) = &self.alias {
            alias.validate()?;
        }

        Ok(())
    }
}

/// Site configuration.
///
/// # Example
///
/// ```toml
/// store = "aliases.json"
/// default_language = "en"
/// reserved_routes = ["/admin", "/user/login"]
/// reserved_prefixes = ["/api"]
///
/// [alias]
/// max_length = 80
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Alias store file (relative to the site root)
    pub store: Option<PathBuf>,

    /// Directory for per-scope lock files (relative to the site root)
    pub lock_dir: Option<PathBuf>,

    /// Document root; existing files and directories count as routes
    pub document_root: Option<PathBuf>,

    /// Language override for this site
    pub default_language: Option<String>,

    /// Routable paths an alias may never shadow
    pub reserved_routes: Option<Vec<String>>,

    /// Path prefixes reserved for the application
    pub reserved_prefixes: Option<Vec<String>>,

    /// Alias generation overrides
    pub alias: Option<AliasSettings>,
}

impl SiteConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(language) = &self.default_language {
            LangCode::new(language.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid default_language: {}", e))
            })?;
        }

        for route in self.reserved_routes.iter().flatten() {
            AliasPath::new(route.as_str())
                .map_err(|e| ConfigError::InvalidValue(format!("invalid reserved route: {}", e)))?;
        }

        for prefix in self.reserved_prefixes.iter().flatten() {
            AliasPath::new(prefix.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid reserved prefix: {}", e))
            })?;
        }

        if let Some(alias) = &self.alias {
            alias.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod alias_settings {
        use super::*;

        #[test]
        fn defaults_are_valid() {
            assert!(AliasSettings::default().validate().is_ok());
        }

        #[test]
        fn zero_lengths_rejected() {
            let settings = AliasSettings {
                max_length: Some(0),
                ..Default::default()
            };
            assert!(settings.validate().is_err());

            let settings = AliasSettings {
                schema_max_length: Some(0),
                ..Default::default()
            };
            assert!(settings.validate().is_err());

            let settings = AliasSettings {
                max_attempts: Some(0),
                ..Default::default()
            };
            assert!(settings.validate().is_err());
        }

        #[test]
        fn separator_with_slash_rejected() {
            let settings = AliasSettings {
                separator: Some("/".to_string()),
                ..Default::default()
            };
            assert!(settings.validate().is_err());
        }

        #[test]
        fn update_action_kebab_case() {
            let settings: AliasSettings = toml::from_str("update_action = \"no-new\"").unwrap();
            assert_eq!(settings.update_action, Some(UpdateAction::NoNew));
            assert!(toml::from_str::<AliasSettings>("update_action = \"delete\"").is_err());
        }

        #[test]
        fn update_action_from_str() {
            assert_eq!("leave".parse::<UpdateAction>().unwrap(), UpdateAction::Leave);
            assert!("bogus".parse::<UpdateAction>().is_err());
            assert_eq!(UpdateAction::default(), UpdateAction::Replace);
        }
    }

    mod global_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = GlobalConfig::default();
            assert!(config.default_language.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn invalid_language() {
            let config = GlobalConfig {
                default_language: Some("en us".to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn invalid_log_level() {
            let config = GlobalConfig {
                log_level: Some("loud".to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn roundtrip() {
            let config = GlobalConfig {
                default_language: Some("en".to_string()),
                log_level: Some("debug".to_string()),
                alias: Some(AliasSettings {
                    max_length: Some(120),
                    schema_max_length: Some(255),
                    separator: Some("_".to_string()),
                    update_action: Some(UpdateAction::Leave),
                    max_attempts: Some(50),
                }),
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: GlobalConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }
    }

    mod site_config {
        use super::*;

        #[test]
        fn valid_routes() {
            let config = SiteConfig {
                reserved_routes: Some(vec!["/admin".to_string(), "/user/login".to_string()]),
                reserved_prefixes: Some(vec!["/api".to_string()]),
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }

        #[test]
        fn relative_route_rejected() {
            let config = SiteConfig {
                reserved_routes: Some(vec!["admin".to_string()]),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn reject_unknown_fields() {
            let toml = r#"
                store = "aliases.json"
                unknown_field = true
            "#;

            let result: Result<SiteConfig, _> = toml::from_str(toml);
            assert!(result.is_err());
        }
    }
}
