// src/resolver/mod.rs

//! Upgrade-path resolution
//!
//! Given an operator and the version currently installed, find the shortest
//! chain of bundle versions leading to the head of the operator's default
//! channel. The flow is:
//!
//! catalog adapter → [`VersionGraph::build`] → [`search::shortest_path`] → [`UpgradePath`]
//!
//! Everything is recomputed per call; nothing is cached between operators.

pub mod graph;
pub mod path;
pub mod search;

pub use graph::VersionGraph;
pub use path::UpgradePath;
pub use search::{SearchLimits, SearchOutcome, SearchStats, search, shortest_path};

use crate::catalog::{Bundle, CatalogAdapter};
use crate::error::{Error, Result};
use crate::version::OperatorVersion;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// What to resolve for one operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub operator: String,
    /// Installed version; empty means nothing is installed yet
    pub start_version: String,
    /// Target version; the default channel head when None
    pub latest_version: Option<String>,
}

impl ResolutionRequest {
    pub fn new(operator: impl Into<String>, start_version: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            start_version: start_version.into(),
            latest_version: None,
        }
    }

    pub fn with_latest(mut self, latest: impl Into<String>) -> Self {
        self.latest_version = Some(latest.into());
        self
    }
}

/// One version on an upgrade path and the bundle that provides it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    pub version: String,
    /// None for a start version the channel has no bundle for
    pub bundle: Option<Bundle>,
}

/// An upgrade path paired with the bundles to mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradePlan {
    pub operator: String,
    pub channel: String,
    pub path: UpgradePath,
    pub steps: Vec<PlanStep>,
}

impl UpgradePlan {
    /// Bundle image references along the path, in upgrade order
    pub fn bundle_images(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| s.bundle.as_ref())
            .filter_map(|b| b.bundle_path.as_deref())
            .collect()
    }

    /// Versions on the path that no bundle in the channel provides
    pub fn missing_bundles(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.bundle.is_none())
            .map(|s| s.version.as_str())
            .collect()
    }
}

/// Catalog data gathered for one request
struct ChannelView {
    channel: String,
    latest: String,
    bundles: Vec<Bundle>,
}

/// The requested target, or the default channel head
///
/// An unparsable target is rejected: nothing could be ordered against it.
fn target_version<C: CatalogAdapter + ?Sized>(
    request: &ResolutionRequest,
    catalog: &C,
) -> Result<String> {
    let target = match request.latest_version.as_deref().filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => catalog
            .default_channel_head_version(&request.operator)?
            .ok_or_else(|| Error::NoDefaultChannelHead(request.operator.clone()))?,
    };
    if let Err(e) = OperatorVersion::parse(&target) {
        warn!("Target of {} is not a version: {}", request.operator, e);
        return Err(e);
    }
    Ok(target)
}

fn load_channel<C: CatalogAdapter + ?Sized>(
    request: &ResolutionRequest,
    catalog: &C,
) -> Result<ChannelView> {
    let operator = request.operator.as_str();
    let channel = catalog
        .default_channel(operator)?
        .ok_or_else(|| Error::NoDefaultChannelHead(operator.to_string()))?;
    let latest = target_version(request, catalog)?;
    let bundles = catalog.channel_bundles(operator, &channel)?;
    Ok(ChannelView {
        channel,
        latest,
        bundles,
    })
}

fn path_for(request: &ResolutionRequest, view: &ChannelView) -> Result<UpgradePath> {
    let start = request.start_version.trim();
    if start.is_empty() {
        return Ok(UpgradePath::single(view.latest.clone()));
    }
    OperatorVersion::parse(start)?;
    let graph = VersionGraph::build(&view.bundles, start, &view.latest);
    shortest_path(&graph, start, &view.latest).map_err(|e| e.with_operator(&request.operator))
}

/// Resolve the shortest upgrade path for `operator` from `start_version` to
/// its default channel head
///
/// Fails with [`Error::NoDefaultChannelHead`] when the package has no head
/// and with [`Error::NoUpgradePath`] when the head is unreachable.
pub fn resolve_upgrade_path<C: CatalogAdapter + ?Sized>(
    operator: &str,
    start_version: &str,
    catalog: &C,
) -> Result<UpgradePath> {
    resolve(&ResolutionRequest::new(operator, start_version), catalog)
}

/// Resolve a request, honouring an explicit target version
pub fn resolve<C: CatalogAdapter + ?Sized>(
    request: &ResolutionRequest,
    catalog: &C,
) -> Result<UpgradePath> {
    let operator = request.operator.as_str();
    let start = request.start_version.trim();

    // Without a start version only the target matters; skip the bundle query
    if start.is_empty() {
        return Ok(UpgradePath::single(target_version(request, catalog)?));
    }

    let view = load_channel(request, catalog)?;
    let path = path_for(request, &view)?;
    info!("Upgrade path for {}: {}", operator, path);
    Ok(path)
}

/// Build the version graph a request would be searched on
pub fn build_graph<C: CatalogAdapter + ?Sized>(
    request: &ResolutionRequest,
    catalog: &C,
) -> Result<VersionGraph> {
    let view = load_channel(request, catalog)?;
    Ok(VersionGraph::build(
        &view.bundles,
        request.start_version.trim(),
        &view.latest,
    ))
}

/// Resolve a request and attach the bundle behind every version on the path
pub fn plan<C: CatalogAdapter + ?Sized>(
    request: &ResolutionRequest,
    catalog: &C,
) -> Result<UpgradePlan> {
    let view = load_channel(request, catalog)?;
    let path = path_for(request, &view)?;

    let mut by_version: HashMap<&str, &Bundle> = HashMap::new();
    for bundle in &view.bundles {
        by_version.entry(bundle.version.as_str()).or_insert(bundle);
    }

    let steps = path
        .versions()
        .iter()
        .map(|v| PlanStep {
            version: v.clone(),
            bundle: by_version.get(v.as_str()).map(|b| (*b).clone()),
        })
        .collect();

    info!("Upgrade plan for {}: {}", request.operator, path);
    Ok(UpgradePlan {
        operator: request.operator.clone(),
        channel: view.channel,
        path,
        steps,
    })
}

/// Shorthand for [`plan`] without an explicit target
pub fn plan_upgrade<C: CatalogAdapter + ?Sized>(
    operator: &str,
    start_version: &str,
    catalog: &C,
) -> Result<UpgradePlan> {
    plan(&ResolutionRequest::new(operator, start_version), catalog)
}

/// Outcome of one operator in [`resolve_all`]
#[derive(Debug)]
pub struct OperatorOutcome {
    pub operator: String,
    pub result: Result<UpgradePlan>,
}

/// Plan every request independently
///
/// A failure for one operator is recorded in its outcome and does not stop
/// the others.
pub fn resolve_all<C: CatalogAdapter + ?Sized>(
    requests: &[ResolutionRequest],
    catalog: &C,
) -> Vec<OperatorOutcome> {
    requests
        .iter()
        .map(|request| {
            let result = plan(request, catalog);
            if let Err(e) = &result {
                warn!("Failed to resolve {}: {}", request.operator, e);
            }
            OperatorOutcome {
                operator: request.operator.clone(),
                result,
            }
        })
        .collect()
}
