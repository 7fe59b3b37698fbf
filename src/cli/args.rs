//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--cwd <path>`: Use this directory as the site root
//! - `--store <path>`: Alias store file, overriding configuration
//! - `--lang <code>`: Language for the operation
//! - `--domain <id>`: Domain chosen for the content (wins over the active domain)
//! - `--active-domain <id>`: Domain negotiated for the request
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::alias::Operation;
use crate::core::config::UpdateAction;

/// dalias - domain-scoped URL alias management
#[derive(Parser, Debug)]
#[command(name = "dalias")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if dalias was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Alias store file (overrides the configured store)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Language code (defaults to the configured default language)
    #[arg(long, global = true, value_name = "CODE")]
    pub lang: Option<String>,

    /// Domain assigned to the content; takes precedence over --active-domain
    #[arg(long, global = true, value_name = "ID")]
    pub domain: Option<String>,

    /// Domain the request was negotiated for
    #[arg(long, global = true, value_name = "ID")]
    pub active_domain: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate and store a unique alias for a source path
    #[command(
        long_about = "Generate and store a unique alias for a source path.\n\n\
            The alias is cleaned, checked against existing aliases in the \
            domain and language, and given a numeric suffix if it is taken.",
        after_help = "\
EXAMPLES:
    # Alias /node/1 as /contact on example_com
    dalias --domain example_com add /node/1 /contact

    # Regenerate an alias, honouring the update action
    dalias --domain example_com add /node/1 /contact-us --op update"
    )]
    Add {
        /// Source path, e.g. /node/1
        source: String,

        /// Candidate alias
        alias: String,

        /// Generation operation
        #[arg(long, value_enum, default_value_t = OpArg::Insert)]
        op: OpArg,

        /// Override the configured update action
        #[arg(long, value_enum)]
        update_action: Option<UpdateActionArg>,
    },

    /// Report whether an alias is reserved for a source
    Check {
        /// Candidate alias
        alias: String,

        /// Source path that would own the alias
        source: String,
    },

    /// Print a unique variant of an alias without storing it
    Uniquify {
        /// Candidate alias
        alias: String,

        /// Source path that would own the alias
        source: String,
    },

    /// Resolve an alias to its source path
    Resolve {
        /// Requested path
        alias: String,
    },

    /// Check a manually entered alias for conflicts
    Validate {
        /// Alias to validate
        alias: String,

        /// Source path the alias is for
        source: String,

        /// Id of the alias row being edited
        #[arg(long)]
        id: Option<u64>,
    },

    /// List stored aliases
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Only aliases in this domain
        #[arg(long = "in-domain", value_name = "ID")]
        in_domain: Option<String>,
    },

    /// Get, set, or list site configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommand actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// Set a config value in the site config
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// List effective config values
    List,
}

/// Supported shells for completion.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

/// `--op` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpArg {
    Insert,
    Update,
    Bulkupdate,
    Return,
}

impl From<OpArg> for Operation {
    fn from(op: OpArg) -> Self {
        match op {
            OpArg::Insert => Operation::Insert,
            OpArg::Update => Operation::Update,
            OpArg::Bulkupdate => Operation::BulkUpdate,
            OpArg::Return => Operation::Return,
        }
    }
}

/// `--update-action` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateActionArg {
    NoNew,
    Leave,
    Replace,
}

impl From<UpdateActionArg> for UpdateAction {
    fn from(action: UpdateActionArg) -> Self {
        match action {
            UpdateActionArg::NoNew => UpdateAction::NoNew,
            UpdateActionArg::Leave => UpdateAction::Leave,
            UpdateActionArg::Replace => UpdateAction::Replace,
        }
    }
}
