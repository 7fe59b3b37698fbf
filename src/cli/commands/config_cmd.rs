//! config command - Get, set, or list configuration values

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::config::{AliasSettings, Config, SiteConfig, UpdateAction};
use crate::core::types::LangCode;

/// Keys understood by `config get` and `config set`.
const KEYS: &[&str] = &[
    "store",
    "lock_dir",
    "document_root",
    "default_language",
    "reserved_routes",
    "reserved_prefixes",
    "alias.max_length",
    "alias.schema_max_length",
    "alias.separator",
    "alias.update_action",
    "alias.max_attempts",
];

fn load(ctx: &Context) -> Result<Config> {
    let root = ctx.site_root()?;
    Config::load(Some(&root)).context("Failed to load config")
}

fn display_path(path: Option<PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn effective(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "store" => display_path(config.store_path()),
        "lock_dir" => display_path(config.lock_dir()),
        "document_root" => display_path(config.document_root()),
        "default_language" => config.default_language().to_string(),
        "reserved_routes" => config.reserved_routes().join(","),
        "reserved_prefixes" => config.reserved_prefixes().join(","),
        "alias.max_length" => config.max_length().to_string(),
        "alias.schema_max_length" => config.schema_max_length().to_string(),
        "alias.separator" => config.separator(),
        "alias.update_action" => config.update_action().as_str().to_string(),
        "alias.max_attempts" => config.max_attempts().to_string(),
        _ => bail!("Unknown configuration key: {}", key),
    };
    Ok(value)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let config = load(ctx)?;
    let value = effective(&config, key)?;

    if value.is_empty() {
        // Key exists but has no value - exit silently
        Ok(())
    } else {
        println!("{}", value);
        Ok(())
    }
}

/// Set a configuration value in the site config.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let root = ctx.site_root()?;
    let mut site: SiteConfig = load(ctx)?.site.unwrap_or_default();

    let parse_usize = |v: &str| -> Result<usize> {
        v.parse()
            .with_context(|| format!("Invalid number for {}: {}", key, v))
    };

    match key {
        "store" => site.store = Some(PathBuf::from(value)),
        "lock_dir" => site.lock_dir = Some(PathBuf::from(value)),
        "document_root" => site.document_root = Some(PathBuf::from(value)),
        "default_language" => {
            LangCode::new(value).context("Invalid language code")?;
            site.default_language = Some(value.to_string());
        }
        "reserved_routes" => site.reserved_routes = Some(split_list(value)),
        "reserved_prefixes" => site.reserved_prefixes = Some(split_list(value)),
        _ if key.starts_with("alias.") => {
            let alias = site.alias.get_or_insert_with(AliasSettings::default);
            match key {
                "alias.max_length" => alias.max_length = Some(parse_usize(value)?),
                "alias.schema_max_length" => alias.schema_max_length = Some(parse_usize(value)?),
                "alias.separator" => alias.separator = Some(value.to_string()),
                "alias.update_action" => {
                    alias.update_action = Some(value.parse::<UpdateAction>()?)
                }
                "alias.max_attempts" => {
                    alias.max_attempts = Some(
                        value
                            .parse()
                            .with_context(|| format!("Invalid number for {}: {}", key, value))?,
                    )
                }
                _ => bail!("Unknown configuration key: {}", key),
            }
        }
        _ => bail!("Unknown configuration key: {}", key),
    }

    site.validate().context("Invalid configuration")?;
    let path = Config::write_site(&root, &site).context("Failed to write config")?;

    if !ctx.quiet {
        println!("Set {} = {} ({})", key, value, path.display());
    }

    Ok(())
}

/// List all effective configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = load(ctx)?;

    println!("# Effective Configuration");
    if let Some(path) = config.global_config_loaded_from() {
        println!("# global: {}", path.display());
    }
    if let Some(path) = config.site_config_loaded_from() {
        println!("# site: {}", path.display());
    }

    for key in KEYS {
        let value = effective(&config, key)?;
        if value.is_empty() {
            println!("{} = (not set)", key);
        } else {
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}
