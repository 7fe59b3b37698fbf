//! cli
//!
//! Command-line interface layer for dalias.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and install logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers assemble the alias components from
//! configuration (see [`commands::Site`]) and format their results; all
//! alias semantics live in [`crate::alias`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::logging::{init_logging, LogLevel};

/// Settings derived from global flags, shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Site root; the current directory when not given.
    pub cwd: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub language: Option<String>,
    pub domain: Option<String>,
    pub active_domain: Option<String>,
    pub debug: bool,
    pub quiet: bool,
}

impl Context {
    /// The site root directory.
    pub fn site_root(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd.clone(),
        store: cli.store.clone(),
        language: cli.lang.clone(),
        domain: cli.domain.clone(),
        active_domain: cli.active_domain.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    // Logging needs the configured level, so peek at config first. A broken
    // config is reported by the command itself.
    let configured = ctx
        .site_root()
        .ok()
        .and_then(|root| Config::load(Some(&root)).ok())
        .and_then(|config| config.log_level().map(str::to_string));
    init_logging(
        LogLevel::from_flags(ctx.debug, ctx.quiet, configured.as_deref()),
        ctx.debug || ctx.quiet,
    );

    commands::dispatch(cli.command, &ctx)
}
