// src/lib.rs

//! opmirror - upgrade paths for mirroring operator catalogs
//!
//! When an operator catalog is mirrored into a disconnected registry, only
//! the bundles a cluster actually needs should be copied: the ones on the
//! shortest upgrade path from the version installed today to the head of the
//! operator's default channel.
//!
//! # Architecture
//!
//! - Catalog-agnostic: the resolver reads through [`CatalogAdapter`], with
//!   adapters for OLM SQLite indexes and static JSON catalogs
//! - Two edge kinds: `replaces` chains and skip-range shortcuts
//! - Deterministic: the shortest path wins, ties go to the first found
//! - Read-only: nothing is fetched, copied, or written during resolution

pub mod catalog;
pub mod config;
pub mod db;
mod error;
pub mod resolver;
pub mod version;

pub use catalog::{Bundle, CatalogAdapter, SqliteCatalog, StaticCatalog};
pub use config::{MirrorConfig, OperatorSpec, parse_config_file};
pub use error::{Error, Result};
pub use resolver::{
    OperatorOutcome, PlanStep, ResolutionRequest, UpgradePath, UpgradePlan, VersionGraph, plan,
    plan_upgrade, resolve, resolve_all, resolve_upgrade_path,
};
pub use version::{Comparison, OperatorVersion, SkipRange, compare, normalize};
