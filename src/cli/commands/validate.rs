//! validate command - Check a manually entered alias for conflicts

use anyhow::{bail, Context as _, Result};

use super::Site;
use crate::cli::Context;
use crate::core::types::{AliasDraft, AliasId, AliasPath, SourcePath};

/// Fail with the violation message if `alias` conflicts with a stored alias.
pub fn validate(ctx: &Context, alias: &str, source: &str, id: Option<u64>) -> Result<()> {
    let site = Site::open(ctx)?;
    let alias = AliasPath::new(alias).context("Invalid alias")?;
    let source = SourcePath::new(source).context("Invalid source path")?;

    let mut draft = AliasDraft::new(
        source,
        alias,
        site.language.clone(),
        site.tenant.domain_id().cloned(),
    );
    if let Some(id) = id {
        draft = draft.with_id(AliasId(id));
    }

    let violation = site
        .validator()
        .validate(&draft, &site.tenant)
        .context("Failed to validate alias")?;

    match violation {
        Some(violation) => bail!("{}", violation),
        None => {
            if !ctx.quiet {
                println!("{} is valid", draft.alias);
            }
            Ok(())
        }
    }
}
