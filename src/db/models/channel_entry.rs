// src/db/models/channel_entry.rs

//! Channel entry model - membership of a bundle in a channel

use crate::error::Result;
use rusqlite::{Connection, params};

/// Row of the `channel_entry` table
///
/// `replaces` points at another entry id; `depth` is the distance from the
/// channel head (0 for the head itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntryRow {
    pub entry_id: Option<i64>,
    pub channel_name: String,
    pub package_name: String,
    pub operatorbundle_name: String,
    pub replaces: Option<i64>,
    pub depth: i64,
}

impl ChannelEntryRow {
    pub fn new(channel_name: &str, package_name: &str, bundle_name: &str, depth: i64) -> Self {
        Self {
            entry_id: None,
            channel_name: channel_name.to_string(),
            package_name: package_name.to_string(),
            operatorbundle_name: bundle_name.to_string(),
            replaces: None,
            depth,
        }
    }

    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO channel_entry
                (channel_name, package_name, operatorbundle_name, replaces, depth)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &self.channel_name,
                &self.package_name,
                &self.operatorbundle_name,
                &self.replaces,
                &self.depth,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.entry_id = Some(id);
        Ok(id)
    }
}
