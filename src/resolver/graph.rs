// src/resolver/graph.rs

//! Version graph construction
//!
//! Nodes are version strings; an edge `a -> b` means an operator running `a`
//! may upgrade directly to `b`. Edges come from two sources:
//!
//! - `replaces`: bundle `b` replacing `a` gives `a -> b`
//! - skip-ranges: bundle `b` with range `R` gives `n -> b` for every node `n` in `R`

use crate::catalog::Bundle;
use crate::version::{self, SkipRange};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Directed graph of upgrade edges between versions
///
/// Node order and each node's successor order follow insertion order, which
/// keeps path search deterministic.
#[derive(Debug, Clone, Default)]
pub struct VersionGraph {
    nodes: Vec<String>,
    edges: HashMap<String, Vec<String>>,
}

impl VersionGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for upgrading from `start_version` to `latest_version`
    ///
    /// Bundles newer than `latest_version` are ignored. A `start_version` with
    /// no matching bundle still gets a node so skip-ranges can reach it.
    /// Malformed skip-ranges are logged and skipped.
    pub fn build(bundles: &[Bundle], start_version: &str, latest_version: &str) -> Self {
        let mut graph = Self::new();

        if version::OperatorVersion::parse(latest_version).is_err() {
            warn!(
                "Target version '{}' is unparsable; every parsable bundle ranks above it",
                latest_version
            );
        }

        let eligible: Vec<&Bundle> = bundles
            .iter()
            .filter(|b| {
                if version::OperatorVersion::parse(&b.version).is_err() {
                    warn!(
                        "Bundle {} has unparsable version '{}', ordering it below all others",
                        b.name, b.version
                    );
                }
                version::compare(&b.version, latest_version) != Ordering::Greater
            })
            .collect();

        debug!(
            "{} of {} bundles are at or below {}",
            eligible.len(),
            bundles.len(),
            latest_version
        );

        for bundle in &eligible {
            graph.add_node(&bundle.version);
        }

        for bundle in &eligible {
            if let Some(replaces) = bundle.replaces.as_deref().filter(|r| !r.is_empty()) {
                graph.add_edge(replaces, &bundle.version);
            }
        }

        if !start_version.is_empty() && !eligible.iter().any(|b| b.version == start_version) {
            debug!("No bundle for start version {}, adding a bare node", start_version);
            graph.add_node(start_version);
        }

        for bundle in &eligible {
            let Some(expr) = bundle.skip_range.as_deref() else {
                continue;
            };
            let range = match SkipRange::parse(expr) {
                Ok(range) => range,
                Err(e) => {
                    warn!("Ignoring skip range of {}: {}", bundle.name, e);
                    continue;
                }
            };

            let admitted: Vec<String> = graph
                .nodes
                .iter()
                .filter(|node| range.contains(node))
                .cloned()
                .collect();
            for node in admitted {
                graph.add_edge(&node, &bundle.version);
            }
        }

        debug!(
            "Built version graph: {} nodes, {} edges",
            graph.len(),
            graph.edge_count()
        );
        graph
    }

    /// Add a node; returns false if it already existed
    pub fn add_node(&mut self, version: &str) -> bool {
        if self.edges.contains_key(version) {
            return false;
        }
        self.nodes.push(version.to_string());
        self.edges.insert(version.to_string(), Vec::new());
        true
    }

    /// Add an edge, creating `from` if needed
    ///
    /// Duplicate edges and self-loops are dropped; returns whether an edge
    /// was added.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        self.add_node(from);
        let successors = self.edges.entry(from.to_string()).or_default();
        if successors.iter().any(|s| s == to) {
            return false;
        }
        successors.push(to.to_string());
        true
    }

    /// Direct upgrade targets of `version`, in insertion order
    pub fn successors(&self, version: &str) -> &[String] {
        self.edges.get(version).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, version: &str) -> bool {
        self.edges.contains_key(version)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.successors(from).iter().any(|s| s == to)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Number of distinct versions
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<Bundle> {
        vec![
            Bundle::new("op.v1.0.0", "v1.0.0"),
            Bundle::new("op.v1.1.0", "v1.1.0").with_replaces("v1.0.0"),
            Bundle::new("op.v2.0.0", "v2.0.0").with_replaces("v1.1.0"),
        ]
    }

    #[test]
    fn test_replaces_edges() {
        let graph = VersionGraph::build(&chain(), "v1.0.0", "v2.0.0");
        assert_eq!(graph.len(), 3);
        assert!(graph.has_edge("v1.0.0", "v1.1.0"));
        assert!(graph.has_edge("v1.1.0", "v2.0.0"));
        assert!(graph.successors("v2.0.0").is_empty());
    }

    #[test]
    fn test_skip_range_edges() {
        let mut bundles = chain();
        bundles[2].skip_range = Some(">=1.0.0 <1.1.0".to_string());
        let graph = VersionGraph::build(&bundles, "v1.0.0", "v2.0.0");

        assert_eq!(graph.successors("v1.0.0"), ["v1.1.0", "v2.0.0"]);
        // 1.1.0 is outside the range
        assert_eq!(graph.successors("v1.1.0"), ["v2.0.0"]);
    }

    #[test]
    fn test_newer_bundles_are_ignored() {
        let mut bundles = chain();
        bundles.push(Bundle::new("op.v3.0.0", "v3.0.0").with_replaces("v2.0.0"));
        let graph = VersionGraph::build(&bundles, "v1.0.0", "v2.0.0");

        assert!(!graph.contains("v3.0.0"));
        assert!(graph.successors("v2.0.0").is_empty());
    }

    #[test]
    fn test_replaced_version_without_bundle_becomes_node() {
        let bundles = vec![Bundle::new("op.v1.1.0", "1.1.0").with_replaces("1.0.5")];
        let graph = VersionGraph::build(&bundles, "1.0.5", "1.1.0");

        assert!(graph.contains("1.0.5"));
        assert_eq!(graph.successors("1.0.5"), ["1.1.0"]);
    }

    #[test]
    fn test_start_version_bootstrap_with_skip_range() {
        let bundles = vec![
            Bundle::new("op.v1.0.0", "1.0.0"),
            Bundle::new("op.v2.0.0", "2.0.0")
                .with_replaces("1.0.0")
                .with_skip_range(">=0.5.0 <2.0.0"),
        ];
        let graph = VersionGraph::build(&bundles, "0.7.3", "2.0.0");

        assert!(graph.contains("0.7.3"));
        assert_eq!(graph.successors("0.7.3"), ["2.0.0"]);
        assert_eq!(graph.successors("1.0.0"), ["2.0.0"]);
    }

    #[test]
    fn test_start_version_without_edges() {
        let graph = VersionGraph::build(&chain(), "v0.1.0", "v2.0.0");
        assert!(graph.contains("v0.1.0"));
        assert!(graph.successors("v0.1.0").is_empty());
    }

    #[test]
    fn test_malformed_skip_range_is_local() {
        let mut bundles = chain();
        bundles[1].skip_range = Some("garbage".to_string());
        bundles[2].skip_range = Some(">=1.0.0 <1.1.0".to_string());
        let graph = VersionGraph::build(&bundles, "v1.0.0", "v2.0.0");

        assert!(graph.has_edge("v1.0.0", "v1.1.0"));
        assert!(graph.has_edge("v1.0.0", "v2.0.0"));
        assert!(graph.has_edge("v1.1.0", "v2.0.0"));
    }

    #[test]
    fn test_duplicate_edges_and_self_loops_suppressed() {
        let bundles = vec![
            Bundle::new("op.v1.0.0", "1.0.0"),
            // Range admits 1.0.0 (already a replaces edge) and 1.1.0 itself
            Bundle::new("op.v1.1.0", "1.1.0")
                .with_replaces("1.0.0")
                .with_skip_range(">=1.0.0 <=1.1.0"),
        ];
        let graph = VersionGraph::build(&bundles, "1.0.0", "1.1.0");

        assert_eq!(graph.successors("1.0.0"), ["1.1.0"]);
        assert!(graph.successors("1.1.0").is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_creates_source() {
        let mut graph = VersionGraph::new();
        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));
        assert!(graph.contains("a"));
        assert!(!graph.contains("b"));
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["a"]);
    }
}
