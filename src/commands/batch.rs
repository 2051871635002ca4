// src/commands/batch.rs
//! Batch planning from a config file

use super::open_catalog;
use super::resolve::print_plan;
use anyhow::{Context, Result, bail};
use opmirror::config::parse_config_file;
use opmirror::resolver::{self, OperatorOutcome};
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct BatchEntry<'a> {
    operator: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a resolver::UpgradePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a OperatorOutcome> for BatchEntry<'a> {
    fn from(outcome: &'a OperatorOutcome) -> Self {
        Self {
            operator: &outcome.operator,
            plan: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(ToString::to_string),
        }
    }
}

/// Plan every operator in a config file
///
/// A catalog given on the command line replaces the config's. All operators
/// are reported before a failure is returned.
pub fn cmd_batch(
    config_path: &Path,
    db_path: Option<&Path>,
    bundles: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = parse_config_file(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let catalog = if db_path.is_some() || bundles.is_some() {
        open_catalog(db_path, bundles)?
    } else {
        open_catalog(config.catalog.db.as_deref(), config.catalog.bundles.as_deref())?
    };

    let requests = config.requests();
    info!("Planning {} operator(s)", requests.len());
    let outcomes = resolver::resolve_all(&requests, &*catalog);

    if json {
        let entries: Vec<BatchEntry> = outcomes.iter().map(BatchEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(plan) => print_plan(plan),
                Err(e) => println!("{}: FAILED: {}", outcome.operator, e),
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        bail!("{} of {} operator(s) could not be planned", failed, outcomes.len());
    }
    Ok(())
}
