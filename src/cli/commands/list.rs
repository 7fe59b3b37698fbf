//! list command - List stored aliases

use anyhow::{Context as _, Result};

use super::Site;
use crate::cli::Context;
use crate::core::types::DomainId;

/// Print stored aliases, optionally restricted to one domain.
pub fn list(ctx: &Context, json: bool, in_domain: Option<&str>) -> Result<()> {
    let site = Site::open(ctx)?;
    let filter = DomainId::parse_optional(in_domain).context("Invalid --in-domain")?;

    let records: Vec<_> = site
        .store
        .list()
        .context("Failed to read alias store")?
        .into_iter()
        .filter(|r| filter.is_none() || r.domain == filter)
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&records).context("Failed to encode aliases")?;
        println!("{}", out);
        return Ok(());
    }

    if records.is_empty() {
        if !ctx.quiet {
            println!("No aliases.");
        }
        return Ok(());
    }

    for record in records {
        println!(
            "{:>5}  {:<24} {:<32} {}",
            record.id.0,
            record.scope().to_string(),
            record.alias.as_str(),
            record.source
        );
    }
    Ok(())
}
