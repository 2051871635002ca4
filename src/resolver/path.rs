// src/resolver/path.rs

//! The resolved upgrade path

use serde::Serialize;
use std::fmt;

/// Ordered, non-empty sequence of versions from the installed version to
/// the channel head
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UpgradePath(Vec<String>);

impl UpgradePath {
    /// Build a path from versions; None if `versions` is empty
    pub fn from_versions(versions: Vec<String>) -> Option<Self> {
        if versions.is_empty() {
            None
        } else {
            Some(Self(versions))
        }
    }

    /// The no-op path containing only `version`
    pub fn single(version: impl Into<String>) -> Self {
        Self(vec![version.into()])
    }

    pub fn versions(&self) -> &[String] {
        &self.0
    }

    pub fn start(&self) -> &str {
        &self.0[0]
    }

    pub fn target(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of upgrade steps (edges) in the path
    pub fn hops(&self) -> usize {
        self.0.len() - 1
    }

    pub fn into_versions(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for UpgradePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" -> "))
    }
}

impl AsRef<[String]> for UpgradePath {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}
