//! resolve command - Resolve an alias to its source path

use anyhow::{Context as _, Result};

use super::Site;
use crate::cli::Context;

/// Print the source path for `alias`, or `alias` itself if unknown.
pub fn resolve(ctx: &Context, alias: &str) -> Result<()> {
    let site = Site::open(ctx)?;
    let path = site
        .resolver()
        .resolve_alias_to_path(alias, Some(&site.language), &site.tenant)
        .with_context(|| format!("Failed to resolve {}", alias))?;

    println!("{}", path);
    Ok(())
}
