// src/catalog/mod.rs

//! Catalog query surface consumed by the upgrade-path resolver
//!
//! The resolver never reads a catalog directly. It asks a [`CatalogAdapter`]
//! for a package's default channel, the channel head version, and the
//! bundles published in that channel. Two adapters ship with the crate:
//!
//! - [`SqliteCatalog`]: reads an extracted OLM catalog index database
//! - [`StaticCatalog`]: in-memory packages, loadable from JSON

mod sqlite;

pub use sqlite::SqliteCatalog;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// One published release of an operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub name: String,
    pub version: String,
    /// Version this bundle supersedes in a one-step upgrade
    #[serde(default)]
    pub replaces: Option<String>,
    #[serde(default, rename = "skipRange", alias = "skip_range")]
    pub skip_range: Option<String>,
    /// Bundle image reference, used by the mirroring pipeline
    #[serde(default, rename = "bundlePath", alias = "bundle_path")]
    pub bundle_path: Option<String>,
}

impl Bundle {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            replaces: None,
            skip_range: None,
            bundle_path: None,
        }
    }

    pub fn with_replaces(mut self, replaces: impl Into<String>) -> Self {
        self.replaces = Some(replaces.into());
        self
    }

    pub fn with_skip_range(mut self, skip_range: impl Into<String>) -> Self {
        self.skip_range = Some(skip_range.into());
        self
    }

    pub fn with_bundle_path(mut self, bundle_path: impl Into<String>) -> Self {
        self.bundle_path = Some(bundle_path.into());
        self
    }
}

/// Read-only catalog queries needed to resolve an upgrade path
///
/// Implementations may block (database or network access); timeout and retry
/// policy belongs to the implementation, not the resolver.
pub trait CatalogAdapter {
    /// Names of every package in the catalog, sorted
    fn packages(&self) -> Result<Vec<String>>;

    /// Name of the package's default channel
    fn default_channel(&self, package: &str) -> Result<Option<String>>;

    /// Version of the default channel's head bundle
    fn default_channel_head_version(&self, package: &str) -> Result<Option<String>>;

    /// Every bundle published in `channel`, with `replaces` expressed as a version
    fn channel_bundles(&self, package: &str, channel: &str) -> Result<Vec<Bundle>>;
}

/// A channel in a [`StaticCatalog`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticChannel {
    /// Version of the channel head
    pub head: String,
    #[serde(default)]
    pub bundles: Vec<Bundle>,
}

/// A package in a [`StaticCatalog`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPackage {
    #[serde(rename = "defaultChannel", alias = "default_channel")]
    pub default_channel: String,
    #[serde(default)]
    pub channels: BTreeMap<String, StaticChannel>,
}

/// In-memory catalog
///
/// JSON layout:
///
/// ```json
/// { "packages": { "etcd": { "defaultChannel": "stable",
///     "channels": { "stable": { "head": "0.9.4", "bundles": [ ... ] } } } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub packages: BTreeMap<String, StaticPackage>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel to `package`, making it the default channel
    ///
    /// The head is the last bundle given; use [`StaticCatalog::set_head`] to
    /// override it.
    pub fn add_channel(&mut self, package: &str, channel: &str, bundles: Vec<Bundle>) {
        let head = bundles.last().map(|b| b.version.clone()).unwrap_or_default();
        let entry = self.packages.entry(package.to_string()).or_default();
        entry.default_channel = channel.to_string();
        entry
            .channels
            .insert(channel.to_string(), StaticChannel { head, bundles });
    }

    /// Override the head version of a channel
    pub fn set_head(&mut self, package: &str, channel: &str, head: &str) -> Result<()> {
        let channel_entry = self
            .packages
            .get_mut(package)
            .and_then(|p| p.channels.get_mut(channel))
            .ok_or_else(|| Error::NotFound(format!("channel {}/{}", package, channel)))?;
        channel_entry.head = head.to_string();
        Ok(())
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a catalog from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(content)?;
        debug!("Loaded static catalog with {} packages", catalog.packages.len());
        Ok(catalog)
    }

    /// Serialize the catalog to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn default_static_channel(&self, package: &str) -> Option<&StaticChannel> {
        let pkg = self.packages.get(package)?;
        pkg.channels.get(&pkg.default_channel)
    }
}

impl CatalogAdapter for StaticCatalog {
    fn packages(&self) -> Result<Vec<String>> {
        Ok(self.packages.keys().cloned().collect())
    }

    fn default_channel(&self, package: &str) -> Result<Option<String>> {
        Ok(self
            .packages
            .get(package)
            .map(|p| p.default_channel.clone())
            .filter(|c| !c.is_empty()))
    }

    fn default_channel_head_version(&self, package: &str) -> Result<Option<String>> {
        Ok(self
            .default_static_channel(package)
            .map(|c| c.head.clone())
            .filter(|h| !h.is_empty()))
    }

    fn channel_bundles(&self, package: &str, channel: &str) -> Result<Vec<Bundle>> {
        self.packages
            .get(package)
            .and_then(|p| p.channels.get(channel))
            .map(|c| c.bundles.clone())
            .ok_or_else(|| Error::NotFound(format!("channel {}/{}", package, channel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StaticCatalog {
        let mut catalog = StaticCatalog::new();
        catalog.add_channel(
            "etcd",
            "stable",
            vec![
                Bundle::new("etcdoperator.v0.9.0", "0.9.0"),
                Bundle::new("etcdoperator.v0.9.2", "0.9.2").with_replaces("0.9.0"),
            ],
        );
        catalog
    }

    #[test]
    fn test_static_catalog_head() {
        let catalog = sample();
        assert_eq!(
            catalog.default_channel("etcd").unwrap(),
            Some("stable".to_string())
        );
        assert_eq!(
            catalog.default_channel_head_version("etcd").unwrap(),
            Some("0.9.2".to_string())
        );
        assert_eq!(catalog.default_channel_head_version("missing").unwrap(), None);
    }

    #[test]
    fn test_static_catalog_packages() {
        let mut catalog = sample();
        catalog.add_channel("argocd", "alpha", vec![Bundle::new("argocd.v0.1.0", "0.1.0")]);
        assert_eq!(catalog.packages().unwrap(), vec!["argocd", "etcd"]);
    }

    #[test]
    fn test_static_catalog_set_head() {
        let mut catalog = sample();
        catalog.set_head("etcd", "stable", "0.9.0").unwrap();
        assert_eq!(
            catalog.default_channel_head_version("etcd").unwrap(),
            Some("0.9.0".to_string())
        );
        assert!(catalog.set_head("etcd", "alpha", "1.0.0").is_err());
    }

    #[test]
    fn test_static_catalog_unknown_channel() {
        let catalog = sample();
        assert!(matches!(
            catalog.channel_bundles("etcd", "alpha"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_static_catalog_json() {
        let json = r#"{
            "packages": {
                "etcd": {
                    "defaultChannel": "stable",
                    "channels": {
                        "stable": {
                            "head": "0.9.2",
                            "bundles": [
                                {"name": "etcdoperator.v0.9.0", "version": "0.9.0"},
                                {"name": "etcdoperator.v0.9.2", "version": "0.9.2",
                                 "replaces": "0.9.0", "skipRange": ">=0.6.0 <0.9.0",
                                 "bundlePath": "quay.io/coreos/etcd-bundle:0.9.2"}
                            ]
                        }
                    }
                }
            }
        }"#;
        let catalog = StaticCatalog::from_json_str(json).unwrap();
        let bundles = catalog.channel_bundles("etcd", "stable").unwrap();
        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles[1].skip_range.as_deref(), Some(">=0.6.0 <0.9.0"));
        assert_eq!(
            bundles[1].bundle_path.as_deref(),
            Some("quay.io/coreos/etcd-bundle:0.9.2")
        );

        let reparsed = StaticCatalog::from_json_str(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, catalog);
    }
}
