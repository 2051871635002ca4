// src/commands/mod.rs
//! Command handlers for the opmirror CLI

mod batch;
mod catalog;
mod resolve;

pub use batch::cmd_batch;
pub use catalog::{cmd_head, cmd_packages};
pub use resolve::{cmd_graph, cmd_path, cmd_plan};

use anyhow::{Context, Result, bail};
use opmirror::{CatalogAdapter, SqliteCatalog, StaticCatalog};
use std::path::Path;
use tracing::debug;

/// Open whichever catalog source was given on the command line
pub(crate) fn open_catalog(
    db_path: Option<&Path>,
    bundles: Option<&Path>,
) -> Result<Box<dyn CatalogAdapter>> {
    // An explicit --bundles wins over a database path inherited from OPMIRROR_DB
    match (db_path, bundles) {
        (_, Some(file)) => {
            debug!("Loading static catalog {}", file.display());
            let catalog = StaticCatalog::from_json_file(file)
                .with_context(|| format!("Failed to load catalog {}", file.display()))?;
            Ok(Box::new(catalog))
        }
        (Some(db), None) => {
            debug!("Opening catalog index {}", db.display());
            let catalog = SqliteCatalog::open(db)
                .with_context(|| format!("Failed to open catalog index {}", db.display()))?;
            Ok(Box::new(catalog))
        }
        (None, None) => bail!("No catalog given; pass --db-path (or set OPMIRROR_DB) or --bundles"),
    }
}
