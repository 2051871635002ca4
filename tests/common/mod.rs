// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use opmirror::db;
use opmirror::db::models::{BundleRow, ChannelEntryRow, ChannelRow, PackageRow};
use opmirror::{Bundle, StaticCatalog};
use std::path::PathBuf;
use tempfile::TempDir;

/// One bundle as it would appear in a catalog index
#[derive(Debug, Clone)]
pub struct FixtureBundle {
    pub name: &'static str,
    pub version: &'static str,
    /// Name of the replaced bundle, as OLM stores it
    pub replaces: Option<&'static str>,
    pub skip_range: Option<&'static str>,
}

pub const fn bundle(
    name: &'static str,
    version: &'static str,
    replaces: Option<&'static str>,
    skip_range: Option<&'static str>,
) -> FixtureBundle {
    FixtureBundle {
        name,
        version,
        replaces,
        skip_range,
    }
}

/// Scenario A: a plain replaces chain v1.0.0 -> v1.1.0 -> v2.0.0
pub fn scenario_a() -> Vec<FixtureBundle> {
    vec![
        bundle("demo.v1.0.0", "v1.0.0", None, None),
        bundle("demo.v1.1.0", "v1.1.0", Some("demo.v1.0.0"), None),
        bundle("demo.v2.0.0", "v2.0.0", Some("demo.v1.1.0"), None),
    ]
}

/// Scenario B: Scenario A plus a skip-range shortcut on the head
pub fn scenario_b() -> Vec<FixtureBundle> {
    let mut bundles = scenario_a();
    bundles[2].skip_range = Some(">=1.0.0 <1.1.0");
    bundles
}

/// Scenario D: a malformed skip-range on one bundle next to a valid one
pub fn scenario_d() -> Vec<FixtureBundle> {
    let mut bundles = scenario_b();
    bundles[1].skip_range = Some("garbage");
    bundles
}

/// Build a [`StaticCatalog`] with one package whose only channel is `stable`
///
/// The head is the last bundle. `replaces` names are translated to versions
/// the way the SQLite adapter does it.
pub fn static_catalog(package: &str, bundles: &[FixtureBundle]) -> StaticCatalog {
    let converted = bundles
        .iter()
        .map(|b| {
            let mut out = Bundle::new(b.name, b.version)
                .with_bundle_path(format!("registry.example.com/{}:{}", package, b.version));
            if let Some(replaced) = b.replaces {
                let version = bundles
                    .iter()
                    .find(|other| other.name == replaced)
                    .map(|other| other.version)
                    .unwrap_or(replaced);
                out = out.with_replaces(version);
            }
            if let Some(range) = b.skip_range {
                out = out.with_skip_range(range);
            }
            out
        })
        .collect();

    let mut catalog = StaticCatalog::new();
    catalog.add_channel(package, "stable", converted);
    catalog
}

/// Create a catalog index database holding `packages`, each with one
/// `stable` channel headed by its last bundle.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn create_index_db(packages: &[(&str, Vec<FixtureBundle>)]) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("index.db");

    db::init(&db_path).unwrap();
    let mut conn = db::open(&db_path).unwrap();

    db::transaction(&mut conn, |tx| {
        for (package, bundles) in packages {
            let head = bundles.last().map(|b| b.name).unwrap_or_default();
            PackageRow::new(package, "stable").insert(tx)?;
            ChannelRow::new("stable", package, head).insert(tx)?;

            // Depth counts back from the head, which is depth 0
            for (depth, b) in bundles.iter().rev().enumerate() {
                let mut row = BundleRow::new(b.name, Some(b.version));
                row.replaces = b.replaces.map(str::to_string);
                row.skiprange = b.skip_range.map(str::to_string);
                row.bundlepath = Some(format!("registry.example.com/{}:{}", package, b.version));
                row.insert(tx)?;
                ChannelEntryRow::new("stable", package, b.name, depth as i64).insert(tx)?;
            }
        }
        Ok(())
    })
    .unwrap();

    (temp_dir, db_path)
}
