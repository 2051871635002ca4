// src/db/models/bundle.rs

//! Operator bundle model - one published release

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Row of the `operatorbundle` table
///
/// `replaces` holds the *name* of the replaced bundle, as OLM stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRow {
    pub name: String,
    pub version: Option<String>,
    pub replaces: Option<String>,
    pub skiprange: Option<String>,
    pub bundlepath: Option<String>,
}

impl BundleRow {
    pub fn new(name: &str, version: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            version: version.map(str::to_string),
            replaces: None,
            skiprange: None,
            bundlepath: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO operatorbundle (name, version, replaces, skiprange, bundlepath)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &self.name,
                &self.version,
                &self.replaces,
                &self.skiprange,
                &self.bundlepath,
            ],
        )?;
        Ok(())
    }

    /// Find a bundle by its exact name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT name, version, replaces, skiprange, bundlepath
             FROM operatorbundle WHERE name = ?1",
        )?;
        let bundle = stmt.query_row([name], Self::from_row).optional()?;
        Ok(bundle)
    }

    /// All distinct bundles in a channel, oldest (deepest) first
    pub fn find_by_channel(
        conn: &Connection,
        package_name: &str,
        channel_name: &str,
    ) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT ob.name, ob.version, ob.replaces, ob.skiprange, ob.bundlepath,
                    MIN(ce.depth) AS depth
             FROM channel_entry ce
             JOIN operatorbundle ob ON ob.name = ce.operatorbundle_name
             WHERE ce.package_name = ?1 AND ce.channel_name = ?2
             GROUP BY ob.name
             ORDER BY depth DESC, ob.name",
        )?;
        let bundles = stmt
            .query_map(params![package_name, channel_name], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(bundles)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            version: row.get(1)?,
            replaces: row.get(2)?,
            skiprange: row.get(3)?,
            bundlepath: row.get(4)?,
        })
    }
}
