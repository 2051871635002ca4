// src/resolver/search.rs

//! Shortest upgrade path search
//!
//! Every walk from the start version is followed until it reaches (or
//! overshoots) the target or runs out of successors. At a node with several
//! successors the walk forks: alternates are explored before the first
//! successor, matching the order in which the walks complete. The shortest
//! completed walk wins; ties go to the walk that completed first.
//!
//! Walks live on an explicit stack instead of the call stack, and each walk
//! is bounded by the number of distinct versions in the graph so a cyclic
//! catalog cannot hang the search. A walk arriving at a version no sooner
//! than an earlier walk did is dropped: whatever it could still reach, the
//! earlier walk reached first with a path no longer. This keeps the search
//! polynomial on catalogs where every bundle skips several predecessors.

use super::graph::VersionGraph;
use super::path::UpgradePath;
use crate::error::{Error, Result};
use crate::version::OperatorVersion;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Default cap on the number of walks a single search may start
pub const DEFAULT_MAX_BRANCHES: usize = 100_000;

/// Tunables for [`search_with_limits`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_branches: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_branches: DEFAULT_MAX_BRANCHES,
        }
    }
}

/// Counters describing how a search went
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Walks started (the primary walk plus every fork)
    pub branches: usize,
    /// Walks that reached the target
    pub completed: usize,
    /// Walks that hit a version with no successors
    pub dead_ends: usize,
    /// Walks abandoned for revisiting a version or exceeding the depth bound
    pub cyclic: usize,
    /// Walks abandoned because they could no longer beat the best path, or
    /// arrived at a version no sooner than an earlier walk
    pub pruned: usize,
    /// Whether the branch cap stopped the search early; no path is returned then
    pub truncated: bool,
}

impl SearchStats {
    fn failure_reason(&self) -> String {
        if self.truncated {
            return format!("search stopped after {} branches", self.branches);
        }
        match (self.dead_ends, self.cyclic) {
            (0, 0) => "no branch reached the target".to_string(),
            (d, 0) => format!("{} branch(es) dead-ended", d),
            (0, c) => format!("{} branch(es) looped back on themselves", c),
            (d, c) => format!(
                "{} branch(es) dead-ended, {} looped back on themselves",
                d, c
            ),
        }
    }
}

/// Result of a search: the winning path, if any, plus statistics
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub path: Option<UpgradePath>,
    pub stats: SearchStats,
}

/// Decides whether a walk standing on a version has arrived
///
/// Overshooting counts as arriving only when the target itself parses;
/// against an unparsable target only the exact version will do.
struct Goal<'a> {
    target: &'a str,
    parsed: Option<OperatorVersion>,
}

impl<'a> Goal<'a> {
    fn new(target: &'a str) -> Self {
        let parsed = match OperatorVersion::parse(target) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("{}; only an exact match will end the search", e);
                None
            }
        };
        Self { target, parsed }
    }

    fn reached(&self, current: &str) -> bool {
        if current == self.target {
            return true;
        }
        match (&self.parsed, OperatorVersion::parse(current)) {
            (Some(target), Ok(current)) => current >= *target,
            _ => false,
        }
    }
}

/// Search with the default limits
pub fn search(graph: &VersionGraph, start: &str, target: &str) -> SearchOutcome {
    search_with_limits(graph, start, target, SearchLimits::default())
}

/// Enumerate walks from `start` to `target` and keep the shortest
pub fn search_with_limits(
    graph: &VersionGraph,
    start: &str,
    target: &str,
    limits: SearchLimits,
) -> SearchOutcome {
    let mut stats = SearchStats::default();

    if start.is_empty() {
        return SearchOutcome {
            path: Some(UpgradePath::single(target)),
            stats,
        };
    }

    let goal = Goal::new(target);
    // A walk longer than the number of distinct versions must repeat one
    let depth_bound = graph.len() + 1;
    let mut best: Option<Vec<String>> = None;
    // Shortest walk length seen arriving at each version
    let mut arrived: HashMap<String, usize> = HashMap::new();
    let mut pending: Vec<Vec<String>> = vec![vec![start.to_string()]];
    stats.branches = 1;

    'search: while let Some(mut walk) = pending.pop() {
        loop {
            let current = walk[walk.len() - 1].as_str();

            if goal.reached(current) {
                stats.completed += 1;
                if best.as_ref().is_none_or(|b| walk.len() < b.len()) {
                    best = Some(walk);
                }
                break;
            }

            match arrived.get(current) {
                Some(&seen) if seen <= walk.len() => {
                    stats.pruned += 1;
                    break;
                }
                _ => {
                    arrived.insert(current.to_string(), walk.len());
                }
            }

            // Every extension is at least one version longer
            if best.as_ref().is_some_and(|b| walk.len() + 1 >= b.len()) {
                stats.pruned += 1;
                break;
            }

            if walk.len() > depth_bound {
                stats.cyclic += 1;
                break;
            }

            let successors: Vec<&String> = graph
                .successors(current)
                .iter()
                .filter(|next| {
                    let seen = walk.contains(next);
                    if seen {
                        debug!("Dropping edge {} -> {}: revisits a version", current, next);
                    }
                    !seen
                })
                .collect();

            if successors.is_empty() {
                if graph.successors(current).is_empty() {
                    debug!("Branch stuck at {}: no successors", current);
                    stats.dead_ends += 1;
                } else {
                    stats.cyclic += 1;
                }
                break;
            }

            if successors.len() == 1 {
                walk.push(successors[0].clone());
                continue;
            }

            stats.branches += successors.len() - 1;
            if stats.branches > limits.max_branches {
                warn!(
                    "Upgrade path search from {} to {} exceeded {} branches",
                    start, target, limits.max_branches
                );
                stats.truncated = true;
                break 'search;
            }

            // Stack order: primary first so the alternates pop before it,
            // alternates reversed so they pop in catalog order.
            let mut primary = walk.clone();
            primary.push(successors[0].clone());
            pending.push(primary);
            for next in successors[1..].iter().rev() {
                let mut fork = walk.clone();
                fork.push((*next).clone());
                pending.push(fork);
            }
            break;
        }
    }

    debug!(
        "Search {} -> {}: {} branches, {} completed, {} dead ends, {} cyclic, {} pruned",
        start,
        target,
        stats.branches,
        stats.completed,
        stats.dead_ends,
        stats.cyclic,
        stats.pruned
    );

    // A truncated search may not have seen the shortest walk
    let path = if stats.truncated {
        None
    } else {
        best.and_then(UpgradePath::from_versions)
    };
    SearchOutcome { path, stats }
}

/// Shortest upgrade path from `start` to `target`
///
/// An empty `start` yields `[target]`. Fails with [`Error::NoUpgradePath`]
/// (operator left blank; see [`Error::with_operator`]) when no walk arrives.
pub fn shortest_path(graph: &VersionGraph, start: &str, target: &str) -> Result<UpgradePath> {
    let outcome = search(graph, start, target);
    outcome.path.ok_or_else(|| Error::NoUpgradePath {
        operator: String::new(),
        version: start.to_string(),
        reason: outcome.stats.failure_reason(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> VersionGraph {
        let mut graph = VersionGraph::new();
        for (from, to) in edges {
            graph.add_node(from);
            graph.add_node(to);
            graph.add_edge(from, to);
        }
        graph
    }

    fn versions(path: &UpgradePath) -> Vec<&str> {
        path.versions().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_empty_start_yields_target() {
        let g = VersionGraph::new();
        let path = shortest_path(&g, "", "2.0.0").unwrap();
        assert_eq!(versions(&path), vec!["2.0.0"]);
    }

    #[test]
    fn test_linear_chain() {
        let g = graph(&[("1.0.0", "1.1.0"), ("1.1.0", "2.0.0")]);
        let path = shortest_path(&g, "1.0.0", "2.0.0").unwrap();
        assert_eq!(versions(&path), vec!["1.0.0", "1.1.0", "2.0.0"]);
    }

    #[test]
    fn test_shortcut_wins() {
        let g = graph(&[
            ("1.0.0", "1.1.0"),
            ("1.0.0", "2.0.0"),
            ("1.1.0", "2.0.0"),
        ]);
        let outcome = search(&g, "1.0.0", "2.0.0");
        let path = outcome.path.unwrap();
        assert_eq!(versions(&path), vec!["1.0.0", "2.0.0"]);
        assert_eq!(outcome.stats.branches, 2);
    }

    #[test]
    fn test_shortcut_deep_in_chain() {
        let g = graph(&[
            ("1.0.0", "1.1.0"),
            ("1.1.0", "1.2.0"),
            ("1.2.0", "1.3.0"),
            ("1.3.0", "2.0.0"),
            ("1.1.0", "1.3.0"),
        ]);
        let path = shortest_path(&g, "1.0.0", "2.0.0").unwrap();
        assert_eq!(versions(&path), vec!["1.0.0", "1.1.0", "1.3.0", "2.0.0"]);
    }

    #[test]
    fn test_tie_goes_to_first_completed() {
        // Both alternates reach the target in two hops; 1.2.0 is an
        // alternate so its walk completes before the primary 1.1.0 walk.
        let g = graph(&[
            ("1.0.0", "1.1.0"),
            ("1.0.0", "1.2.0"),
            ("1.1.0", "2.0.0"),
            ("1.2.0", "2.0.0"),
        ]);
        let path = shortest_path(&g, "1.0.0", "2.0.0").unwrap();
        assert_eq!(versions(&path), vec!["1.0.0", "1.2.0", "2.0.0"]);
    }

    #[test]
    fn test_dead_end_branch_does_not_fail_search() {
        // The dead end 1.0.1 is an alternate, so it is walked first
        let g = graph(&[
            ("1.0.0", "1.1.0"),
            ("1.0.0", "1.0.1"),
            ("1.1.0", "2.0.0"),
        ]);
        let outcome = search(&g, "1.0.0", "2.0.0");
        assert_eq!(
            versions(outcome.path.as_ref().unwrap()),
            vec!["1.0.0", "1.1.0", "2.0.0"]
        );
        assert_eq!(outcome.stats.dead_ends, 1);
    }

    #[test]
    fn test_no_successors_fails() {
        let g = graph(&[("1.0.0", "2.0.0")]);
        let err = shortest_path(&g, "0.5.0", "2.0.0").unwrap_err();
        match err {
            Error::NoUpgradePath { version, reason, .. } => {
                assert_eq!(version, "0.5.0");
                assert!(reason.contains("dead-ended"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_terminates() {
        let g = graph(&[("1.0.0", "1.1.0"), ("1.1.0", "1.0.0")]);
        let outcome = search(&g, "1.0.0", "2.0.0");
        assert!(outcome.path.is_none());
        assert_eq!(outcome.stats.cyclic, 1);
        assert!(shortest_path(&g, "1.0.0", "2.0.0").is_err());
    }

    #[test]
    fn test_cycle_beside_valid_route() {
        let g = graph(&[
            ("1.0.0", "1.1.0"),
            ("1.1.0", "1.0.0"),
            ("1.1.0", "2.0.0"),
        ]);
        let path = shortest_path(&g, "1.0.0", "2.0.0").unwrap();
        assert_eq!(versions(&path), vec!["1.0.0", "1.1.0", "2.0.0"]);
    }

    #[test]
    fn test_overshoot_terminates() {
        // 2.1.0 lies past the target; the walk stops there
        let g = graph(&[("1.0.0", "2.1.0")]);
        let path = shortest_path(&g, "1.0.0", "2.0.0").unwrap();
        assert_eq!(versions(&path), vec!["1.0.0", "2.1.0"]);
    }

    #[test]
    fn test_start_at_target() {
        let g = graph(&[("1.0.0", "2.0.0")]);
        let path = shortest_path(&g, "2.0.0", "2.0.0").unwrap();
        assert_eq!(versions(&path), vec!["2.0.0"]);
    }

    #[test]
    fn test_branch_limit() {
        let g = graph(&[
            ("1.0.0", "1.1.0"),
            ("1.0.0", "1.2.0"),
            ("1.1.0", "1.5.0"),
            ("1.2.0", "1.5.0"),
        ]);
        let outcome = search_with_limits(&g, "1.0.0", "2.0.0", SearchLimits { max_branches: 1 });
        assert!(outcome.path.is_none());
        assert!(outcome.stats.truncated);
    }

    #[test]
    fn test_branch_limit_discards_completed_walk() {
        // 1.2.0 completes a 3-hop walk, then the fork at 1.1.0 trips the cap
        let g = graph(&[
            ("1.0.0", "1.1.0"),
            ("1.0.0", "1.2.0"),
            ("1.2.0", "1.3.0"),
            ("1.3.0", "2.0.0"),
            ("1.1.0", "1.4.0"),
            ("1.1.0", "1.5.0"),
        ]);
        let outcome = search_with_limits(&g, "1.0.0", "2.0.0", SearchLimits { max_branches: 2 });
        assert_eq!(outcome.stats.completed, 1);
        assert!(outcome.stats.truncated);
        assert!(outcome.path.is_none());

        let path = shortest_path(&g, "1.0.0", "2.0.0").unwrap();
        assert_eq!(versions(&path), vec!["1.0.0", "1.2.0", "1.3.0", "2.0.0"]);
    }

    #[test]
    fn test_later_arrival_at_seen_version_is_dropped() {
        // 1.1.0 is reached at depth 2 by the alternate before the primary
        // walk gets there at depth 3
        let g = graph(&[
            ("1.0.0", "1.0.5"),
            ("1.0.0", "1.1.0"),
            ("1.0.5", "1.1.0"),
            ("1.1.0", "1.2.0"),
            ("1.2.0", "2.0.0"),
        ]);
        let outcome = search(&g, "1.0.0", "2.0.0");
        assert_eq!(
            versions(outcome.path.as_ref().unwrap()),
            vec!["1.0.0", "1.1.0", "1.2.0", "2.0.0"]
        );
        assert_eq!(outcome.stats.completed, 1);
        assert_eq!(outcome.stats.pruned, 1);
    }

    #[test]
    fn test_windowed_skip_ranges_stay_minimal() {
        // Every version can jump up to five ahead
        let mut edges = Vec::new();
        for k in 1..=100u32 {
            for from in k.saturating_sub(5)..k {
                edges.push((format!("1.{}.0", from), format!("1.{}.0", k)));
            }
        }
        let mut g = VersionGraph::new();
        for (from, to) in &edges {
            g.add_node(from);
            g.add_node(to);
            g.add_edge(from, to);
        }

        let outcome = search(&g, "1.0.0", "1.100.0");
        assert!(!outcome.stats.truncated);
        assert_eq!(outcome.path.unwrap().hops(), 20);
    }

    #[test]
    fn test_unparsable_target_needs_exact_match() {
        let g = graph(&[("1.0.0", "2.0.0")]);
        assert!(shortest_path(&g, "1.0.0", "latest").is_err());

        let g = graph(&[("1.0.0", "latest")]);
        let path = shortest_path(&g, "1.0.0", "latest").unwrap();
        assert_eq!(versions(&path), vec!["1.0.0", "latest"]);
    }

    #[test]
    fn test_result_is_minimal_over_all_walks() {
        // Diamond ladder: every rung offers a one-step and a two-step option
        let g = graph(&[
            ("1", "2"),
            ("1", "3"),
            ("2", "3"),
            ("3", "4"),
            ("3", "5"),
            ("4", "5"),
            ("5", "6"),
            ("5", "7"),
            ("6", "7"),
        ]);
        let path = shortest_path(&g, "1", "7").unwrap();
        assert_eq!(versions(&path), vec!["1", "3", "5", "7"]);
    }
}
