// src/db/models/package.rs

//! Package model - one operator in the catalog

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Row of the `package` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRow {
    pub name: String,
    pub default_channel: Option<String>,
}

impl PackageRow {
    pub fn new(name: &str, default_channel: &str) -> Self {
        Self {
            name: name.to_string(),
            default_channel: Some(default_channel.to_string()),
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO package (name, default_channel) VALUES (?1, ?2)",
            params![&self.name, &self.default_channel],
        )?;
        Ok(())
    }

    /// Find a package by exact name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT name, default_channel FROM package WHERE name = ?1")?;
        let package = stmt.query_row([name], Self::from_row).optional()?;
        Ok(package)
    }

    /// List every package name, sorted
    pub fn list_names(conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn.prepare("SELECT name FROM package ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            default_channel: row.get(1)?,
        })
    }
}
