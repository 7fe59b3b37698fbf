//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the [`Site`] (config, store, tenant, language)
//! 2. Calls the alias component for the command
//! 3. Formats and displays output
//!
//! Handlers never write to the store directly; writes go through
//! [`AliasGenerator`].

mod add;
mod check;
mod completion;
mod config_cmd;
mod list;
mod resolve;
mod uniquify;
mod validate;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use check::check;
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use list::list;
pub use resolve::resolve;
pub use uniquify::uniquify;
pub use validate::validate;

use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::args::{Command, ConfigAction};
use super::Context;
use crate::alias::{
    AliasGenerator, AliasResolver, AliasUniquifier, AliasValidator, FilesystemRoutes,
    FixedLanguage, PrefixReservation, RouteSet, StaticRoutes, TenantContext, UniquifySettings,
};
use crate::core::config::Config;
use crate::core::paths::SitePaths;
use crate::core::types::{DomainId, LangCode};
use crate::store::{AliasStore, FileAliasStore};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Add {
            source,
            alias,
            op,
            update_action,
        } => add::add(ctx, &source, &alias, op.into(), update_action.map(Into::into)),
        Command::Check { alias, source } => check::check(ctx, &alias, &source),
        Command::Uniquify { alias, source } => uniquify::uniquify(ctx, &alias, &source),
        Command::Resolve { alias } => resolve::resolve(ctx, &alias),
        Command::Validate { alias, source, id } => validate::validate(ctx, &alias, &source, id),
        Command::List { json, in_domain } => list::list(ctx, json, in_domain.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Everything a command needs to work on one site.
pub struct Site {
    pub config: Config,
    pub store: Arc<dyn AliasStore>,
    pub tenant: TenantContext,
    pub language: LangCode,
}

impl Site {
    /// Load config and open the store for the context's site.
    pub fn open(ctx: &Context) -> Result<Self> {
        let root = ctx.site_root()?;
        let config = Config::load(Some(&root)).context("Failed to load config")?;

        let paths = SitePaths::new(root);
        let store = match (&ctx.store, config.store_path()) {
            (Some(path), _) => FileAliasStore::new(paths.resolve(path)),
            (None, Some(path)) => FileAliasStore::new(path),
            (None, None) => FileAliasStore::for_site(&paths),
        };
        let store: Arc<dyn AliasStore> = Arc::new(store);

        let active = DomainId::parse_optional(ctx.active_domain.as_deref())
            .context("Invalid --active-domain")?;
        let domain =
            DomainId::parse_optional(ctx.domain.as_deref()).context("Invalid --domain")?;
        let tenant = TenantContext::new(active).with_override(domain);

        let language = match &ctx.language {
            Some(code) => LangCode::new(code.as_str()).context("Invalid --lang")?,
            None => config.default_language(),
        };

        Ok(Self {
            config,
            store,
            tenant,
            language,
        })
    }

    /// Uniquifier with the site's reserved routes, document root and prefixes.
    pub fn uniquifier(&self) -> AliasUniquifier {
        let mut routes = RouteSet::new().with(StaticRoutes::new(self.config.reserved_routes()));
        if let Some(root) = self.config.document_root() {
            routes = routes.with(FilesystemRoutes::new(root));
        }

        let uniquifier = AliasUniquifier::new(
            Arc::clone(&self.store),
            UniquifySettings::from_config(&self.config),
        )
        .with_routes(routes);

        let prefixes = PrefixReservation::new(self.config.reserved_prefixes());
        if prefixes.is_empty() {
            uniquifier
        } else {
            uniquifier.with_extension(prefixes)
        }
    }

    pub fn generator(&self) -> AliasGenerator {
        AliasGenerator::configured(self.uniquifier(), &self.config)
    }

    pub fn resolver(&self) -> AliasResolver {
        AliasResolver::new(Arc::clone(&self.store), FixedLanguage(self.language.clone()))
    }

    pub fn validator(&self) -> AliasValidator {
        AliasValidator::new(Arc::clone(&self.store))
    }
}
