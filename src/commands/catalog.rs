// src/commands/catalog.rs
//! Catalog inspection commands

use super::open_catalog;
use anyhow::{Result, bail};
use std::path::Path;

/// Show an operator's default channel and its head version
pub fn cmd_head(operator: &str, db_path: Option<&Path>, bundles: Option<&Path>) -> Result<()> {
    let catalog = open_catalog(db_path, bundles)?;

    let Some(channel) = catalog.default_channel(operator)? else {
        bail!("Package '{}' has no default channel", operator);
    };
    let head = catalog
        .default_channel_head_version(operator)?
        .ok_or_else(|| anyhow::anyhow!("Channel '{}' of '{}' has no head", channel, operator))?;

    println!("{}", operator);
    println!("  Default channel: {}", channel);
    println!("  Head version:    {}", head);
    Ok(())
}

/// List the packages a catalog carries
pub fn cmd_packages(db_path: Option<&Path>, bundles: Option<&Path>) -> Result<()> {
    let names = open_catalog(db_path, bundles)?.packages()?;

    if names.is_empty() {
        println!("No packages found.");
        return Ok(());
    }

    println!("Packages ({}):", names.len());
    for name in &names {
        println!("  {}", name);
    }
    Ok(())
}
