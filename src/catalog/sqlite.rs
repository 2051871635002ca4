// src/catalog/sqlite.rs

//! Catalog adapter over an extracted OLM catalog index database

use super::{Bundle, CatalogAdapter};
use crate::db;
use crate::db::models::{BundleRow, ChannelRow, PackageRow};
use crate::error::{Error, Result};
use crate::version::version_from_bundle_name;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Read-only view of a catalog index database
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open an index database read-only and check its schema
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = db::open_read_only(db_path)?;
        if !db::schema::has_index_schema(&conn)? {
            return Err(Error::NotFound(format!(
                "catalog index tables in {}",
                db_path.display()
            )));
        }
        Ok(Self { conn })
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Version of a bundle row
    ///
    /// The `version` column is authoritative; the bundle name is only
    /// consulted for indexes that never populated it.
    fn row_version(row: &BundleRow) -> Option<String> {
        match row.version.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                let derived = version_from_bundle_name(&row.name);
                debug!(
                    "Bundle {} has no version column, derived {:?} from its name",
                    row.name, derived
                );
                derived
            }
        }
    }
}

impl CatalogAdapter for SqliteCatalog {
    fn packages(&self) -> Result<Vec<String>> {
        PackageRow::list_names(&self.conn)
    }

    fn default_channel(&self, package: &str) -> Result<Option<String>> {
        Ok(PackageRow::find_by_name(&self.conn, package)?
            .and_then(|p| p.default_channel)
            .filter(|c| !c.is_empty()))
    }

    fn default_channel_head_version(&self, package: &str) -> Result<Option<String>> {
        let Some(channel) = self.default_channel(package)? else {
            return Ok(None);
        };
        let Some(head) = ChannelRow::find(&self.conn, package, &channel)?
            .and_then(|c| c.head_operatorbundle_name)
        else {
            return Ok(None);
        };

        match BundleRow::find_by_name(&self.conn, &head)? {
            Some(row) => Ok(Self::row_version(&row)),
            None => {
                warn!(
                    "Head bundle {} of {}/{} is not in the index",
                    head, package, channel
                );
                Ok(version_from_bundle_name(&head))
            }
        }
    }

    fn channel_bundles(&self, package: &str, channel: &str) -> Result<Vec<Bundle>> {
        let rows = BundleRow::find_by_channel(&self.conn, package, channel)?;

        let versions: HashMap<&str, String> = rows
            .iter()
            .filter_map(|row| Self::row_version(row).map(|v| (row.name.as_str(), v)))
            .collect();

        let mut bundles = Vec::with_capacity(rows.len());
        for row in &rows {
            let Some(version) = versions.get(row.name.as_str()) else {
                warn!("Skipping bundle {}: no usable version", row.name);
                continue;
            };

            // OLM stores the replaced bundle's name; the resolver wants its version
            let replaces = row
                .replaces
                .as_deref()
                .filter(|r| !r.is_empty())
                .map(|r| match versions.get(r) {
                    Some(v) => v.clone(),
                    None => version_from_bundle_name(r).unwrap_or_else(|| {
                        warn!("Cannot derive a version from replaced bundle {}", r);
                        r.to_string()
                    }),
                });

            bundles.push(Bundle {
                name: row.name.clone(),
                version: version.clone(),
                replaces,
                skip_range: row.skiprange.clone().filter(|s| !s.trim().is_empty()),
                bundle_path: row.bundlepath.clone().filter(|s| !s.is_empty()),
            });
        }

        debug!(
            "Loaded {} bundles for {}/{}",
            bundles.len(),
            package,
            channel
        );
        Ok(bundles)
    }
}
