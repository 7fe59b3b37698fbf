//! uniquify command - Print a unique variant without storing it

use anyhow::{Context as _, Result};

use super::Site;
use crate::cli::Context;
use crate::core::types::{AliasPath, SourcePath};

/// Print the alias `source` would get for `alias`.
pub fn uniquify(ctx: &Context, alias: &str, source: &str) -> Result<()> {
    let site = Site::open(ctx)?;
    let alias = AliasPath::new(alias).context("Invalid alias")?;
    let source = SourcePath::new(source).context("Invalid source path")?;

    let unique = site
        .uniquifier()
        .uniquify(&alias, &source, &site.language, site.tenant.domain_id())
        .with_context(|| format!("Failed to find a unique variant of {}", alias))?;

    println!("{}", unique);
    Ok(())
}
