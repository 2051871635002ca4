// src/config/mod.rs

//! Batch mirroring configuration
//!
//! A TOML file naming the catalog to read and the operators to resolve:
//!
//! ```toml
//! version = 1
//!
//! [catalog]
//! db = "/tmp/index.db"
//!
//! [[operator]]
//! name = "etcd"
//! start_version = "0.9.2"
//!
//! [[operator]]
//! name = "jaeger-product"
//! ```

use crate::error::{Error, Result};
use crate::resolver::ResolutionRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Current config file version
pub const CONFIG_VERSION: u32 = 1;

/// Top-level batch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Config file version (for forward compatibility)
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub catalog: CatalogSource,

    /// Operators to resolve, in order
    #[serde(default, rename = "operator")]
    pub operators: Vec<OperatorSpec>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Where catalog data comes from
///
/// At most one may be set. When neither is, the command line supplies it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSource {
    /// Extracted catalog index database
    pub db: Option<PathBuf>,
    /// Static catalog JSON file
    pub bundles: Option<PathBuf>,
}

/// One operator to mirror
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatorSpec {
    pub name: String,
    /// Installed version; absent means mirror only the channel head
    #[serde(default)]
    pub start_version: Option<String>,
    /// Override the target instead of using the channel head
    #[serde(default)]
    pub target_version: Option<String>,
}

impl OperatorSpec {
    pub fn to_request(&self) -> ResolutionRequest {
        ResolutionRequest {
            operator: self.name.clone(),
            start_version: self.start_version.clone().unwrap_or_default(),
            latest_version: self.target_version.clone(),
        }
    }
}

impl MirrorConfig {
    /// Validate the config for consistency
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(Error::Config(format!(
                "unsupported config version {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }

        if self.catalog.db.is_some() && self.catalog.bundles.is_some() {
            return Err(Error::Config(
                "catalog.db and catalog.bundles are mutually exclusive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for op in &self.operators {
            if op.name.trim().is_empty() {
                return Err(Error::Config("operator with empty name".to_string()));
            }
            if !seen.insert(op.name.as_str()) {
                return Err(Error::Config(format!(
                    "operator '{}' listed more than once",
                    op.name
                )));
            }
        }

        Ok(())
    }

    /// Resolution requests for every configured operator
    pub fn requests(&self) -> Vec<ResolutionRequest> {
        self.operators.iter().map(OperatorSpec::to_request).collect()
    }

    /// Resolve relative catalog paths against the config file's directory
    fn rebase(&mut self, base: &Path) {
        for path in [&mut self.catalog.db, &mut self.catalog.bundles]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Parse a config from a TOML file
pub fn parse_config_file(path: &Path) -> Result<MirrorConfig> {
    let content = std::fs::read_to_string(path)?;
    let mut config = parse_config_string(&content)?;
    if let Some(base) = path.parent() {
        config.rebase(base);
    }
    Ok(config)
}

/// Parse a config from a TOML string
pub fn parse_config_string(content: &str) -> Result<MirrorConfig> {
    let config: MirrorConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
