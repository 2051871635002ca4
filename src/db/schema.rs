// src/db/schema.rs

//! OLM catalog index schema
//!
//! Only the four tables the resolver reads are modelled. Column names match
//! the operator-registry SQLite layout so extracted catalog indexes can be
//! opened directly.

use crate::error::Result;
use rusqlite::Connection;
use tracing::debug;

/// Tables the resolver depends on
pub const INDEX_TABLES: [&str; 4] = ["operatorbundle", "package", "channel", "channel_entry"];

/// Create the catalog index tables if they do not exist
pub fn create_index_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS operatorbundle (
            name TEXT PRIMARY KEY,
            csv TEXT,
            bundle TEXT,
            bundlepath TEXT,
            skiprange TEXT,
            version TEXT,
            replaces TEXT,
            skips TEXT
        );

        CREATE TABLE IF NOT EXISTS package (
            name TEXT PRIMARY KEY,
            default_channel TEXT
        );

        CREATE TABLE IF NOT EXISTS channel (
            name TEXT,
            package_name TEXT,
            head_operatorbundle_name TEXT,
            PRIMARY KEY (name, package_name)
        );

        CREATE TABLE IF NOT EXISTS channel_entry (
            entry_id INTEGER PRIMARY KEY,
            channel_name TEXT,
            package_name TEXT,
            operatorbundle_name TEXT,
            replaces INTEGER,
            depth INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_channel_entry_channel
            ON channel_entry(package_name, channel_name);
        ",
    )?;
    debug!("Catalog index schema ready");
    Ok(())
}

/// Check that every table the resolver reads is present
pub fn has_index_schema(conn: &Connection) -> Result<bool> {
    for table in INDEX_TABLES {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        if count == 0 {
            debug!("Catalog index is missing table '{}'", table);
            return Ok(false);
        }
    }
    Ok(true)
}
