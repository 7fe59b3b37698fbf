//! add command - Generate and store an alias

use anyhow::{Context as _, Result};

use super::Site;
use crate::alias::{GenerateRequest, Operation};
use crate::cli::Context;
use crate::core::config::UpdateAction;

/// Generate an alias for `source` and store it in the tenant's scope.
pub fn add(
    ctx: &Context,
    source: &str,
    alias: &str,
    op: Operation,
    update_action: Option<UpdateAction>,
) -> Result<()> {
    let site = Site::open(ctx)?;
    let mut generator = site.generator();
    if let Some(action) = update_action {
        generator = generator.with_update_action(action);
    }

    let request = GenerateRequest::new(source, alias, site.language.clone(), op);
    let generated = generator
        .generate(&request, &site.tenant)
        .with_context(|| format!("Failed to generate alias for {}", source))?;

    let Some(generated) = generated else {
        if !ctx.quiet {
            println!("No alias generated for {}", source);
        }
        return Ok(());
    };

    if ctx.quiet {
        println!("{}", generated.alias);
        return Ok(());
    }

    if generated.renamed() {
        println!(
            "Alias {} conflicted with an existing alias, changed to {}",
            generated.original, generated.alias
        );
    }
    match &generated.record {
        Some(record) => println!(
            "{} -> {} [{}] (id {})",
            record.alias,
            record.source,
            record.scope(),
            record.id
        ),
        None => println!("{}", generated.alias),
    }

    Ok(())
}
