// src/commands/resolve.rs
//! Upgrade path commands

use super::open_catalog;
use anyhow::{Context, Result};
use opmirror::resolver::{self, ResolutionRequest, UpgradePlan};
use std::path::Path;
use tracing::info;

fn request(operator: &str, start_version: &str, target_version: Option<&str>) -> ResolutionRequest {
    let request = ResolutionRequest::new(operator, start_version);
    match target_version {
        Some(target) => request.with_latest(target),
        None => request,
    }
}

/// Print the shortest upgrade path
pub fn cmd_path(
    operator: &str,
    start_version: &str,
    target_version: Option<&str>,
    db_path: Option<&Path>,
    bundles: Option<&Path>,
    json: bool,
) -> Result<()> {
    let catalog = open_catalog(db_path, bundles)?;
    let request = request(operator, start_version, target_version);
    let path = resolver::resolve(&request, &*catalog)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&path)?);
    } else {
        println!("{}", path);
    }
    Ok(())
}

pub(crate) fn print_plan(plan: &UpgradePlan) {
    println!("{} (channel {}):", plan.operator, plan.channel);
    for step in &plan.steps {
        match &step.bundle {
            Some(bundle) => match &bundle.bundle_path {
                Some(image) => println!("  {}  {}  {}", step.version, bundle.name, image),
                None => println!("  {}  {}", step.version, bundle.name),
            },
            None => println!("  {}  (installed, not in channel)", step.version),
        }
    }
    println!("  {} upgrade step(s)", plan.path.hops());
}

/// Print the upgrade path with the bundle behind each version
pub fn cmd_plan(
    operator: &str,
    start_version: &str,
    target_version: Option<&str>,
    db_path: Option<&Path>,
    bundles: Option<&Path>,
    json: bool,
) -> Result<()> {
    let catalog = open_catalog(db_path, bundles)?;
    let request = request(operator, start_version, target_version);
    let plan = resolver::plan(&request, &*catalog)
        .with_context(|| format!("Failed to plan upgrade of {}", operator))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

/// Dump the version graph the search would run on
pub fn cmd_graph(
    operator: &str,
    start_version: &str,
    target_version: Option<&str>,
    db_path: Option<&Path>,
    bundles: Option<&Path>,
) -> Result<()> {
    let catalog = open_catalog(db_path, bundles)?;
    let request = request(operator, start_version, target_version);
    let graph = resolver::build_graph(&request, &*catalog)?;
    info!(
        "Graph for {}: {} versions, {} edges",
        operator,
        graph.len(),
        graph.edge_count()
    );

    for node in graph.nodes() {
        let successors = graph.successors(node);
        if successors.is_empty() {
            println!("{}", node);
        } else {
            println!("{} -> {}", node, successors.join(", "));
        }
    }
    Ok(())
}
