//! check command - Report whether an alias is reserved

use anyhow::{Context as _, Result};

use super::Site;
use crate::cli::Context;
use crate::core::types::{AliasPath, Scope, SourcePath};

/// Print `reserved` or `available` for `alias` as owned by `source`.
pub fn check(ctx: &Context, alias: &str, source: &str) -> Result<()> {
    let site = Site::open(ctx)?;
    let alias = AliasPath::new(alias).context("Invalid alias")?;
    let source = SourcePath::new(source).context("Invalid source path")?;

    let reserved = site
        .uniquifier()
        .is_reserved(&alias, &source, &site.language, site.tenant.domain_id())
        .context("Failed to check alias")?;

    let status = if reserved { "reserved" } else { "available" };
    if ctx.quiet {
        println!("{}", status);
    } else {
        let scope = Scope::new(site.tenant.domain_id().cloned(), site.language.clone());
        println!("{} is {} in {}", alias, status, scope);
    }
    Ok(())
}
