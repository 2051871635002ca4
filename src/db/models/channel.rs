// src/db/models/channel.rs

//! Channel model - a named release stream of a package

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Row of the `channel` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRow {
    pub name: String,
    pub package_name: String,
    pub head_operatorbundle_name: Option<String>,
}

impl ChannelRow {
    pub fn new(name: &str, package_name: &str, head: &str) -> Self {
        Self {
            name: name.to_string(),
            package_name: package_name.to_string(),
            head_operatorbundle_name: Some(head.to_string()),
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO channel (name, package_name, head_operatorbundle_name)
             VALUES (?1, ?2, ?3)",
            params![&self.name, &self.package_name, &self.head_operatorbundle_name],
        )?;
        Ok(())
    }

    /// Find a channel of a package
    pub fn find(conn: &Connection, package_name: &str, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT name, package_name, head_operatorbundle_name
             FROM channel WHERE package_name = ?1 AND name = ?2",
        )?;
        let channel = stmt
            .query_row([package_name, name], Self::from_row)
            .optional()?;
        Ok(channel)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            package_name: row.get(1)?,
            head_operatorbundle_name: row.get(2)?,
        })
    }
}
