// src/db/mod.rs

//! Access to OLM catalog index databases
//!
//! The catalog index is a SQLite file extracted from a catalog image. The
//! resolver only ever reads it; [`init`] and [`transaction`] exist so test
//! fixtures and tooling can build index files with the same schema.

pub mod models;
pub mod schema;

use crate::error::Result;
use rusqlite::{Connection, OpenFlags, Transaction};
use std::path::Path;
use tracing::{debug, info};

/// Create a new catalog index database with the OLM schema
pub fn init(db_path: impl AsRef<Path>) -> Result<()> {
    let db_path = db_path.as_ref();
    info!("Creating catalog index at: {}", db_path.display());
    let conn = Connection::open(db_path)?;
    schema::create_index_schema(&conn)?;
    Ok(())
}

/// Open a catalog index for reading and writing
pub fn open(db_path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(db_path.as_ref())?;
    debug!("Opened catalog index: {}", db_path.as_ref().display());
    Ok(conn)
}

/// Open a catalog index read-only
///
/// Fails if the file does not exist instead of creating an empty database.
pub fn open_read_only(db_path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path.as_ref(),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    debug!("Opened catalog index read-only: {}", db_path.as_ref().display());
    Ok(conn)
}

/// Run `f` inside a transaction, committing on success
pub fn transaction<F, T>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let result = f(&tx)?;
    tx.commit()?;
    Ok(result)
}
