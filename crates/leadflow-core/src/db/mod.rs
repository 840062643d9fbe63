//! SQLite persistence for the catalog, leads and their audit trail.
//!
//! The engine never touches storage; this module is the caller-side
//! collaborator that commits what the engine returns. Two rules hold for
//! every write path:
//!
//! - catalog mutations run load, mutate and save inside one
//!   `BEGIN IMMEDIATE` transaction, so two writers can never both pass a
//!   singleton check;
//! - a transition writes the history row, then the lead pointer, then the
//!   activity row, inside one transaction.

use std::path::Path;

use jiff::Timestamp;
use rusqlite::{types::Type, Connection, Row};
use serde::de::DeserializeOwned;

use crate::error::{DatabaseResultExt, Result};

pub mod catalog_queries;
pub mod lead_queries;
pub mod migrations;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

fn conversion_error(
    index: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
}

/// Reads an RFC 3339 text column.
pub(crate) fn timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| conversion_error(index, e))
}

/// Reads a JSON text column.
pub(crate) fn json_column<T: DeserializeOwned>(row: &Row<'_>, index: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(index)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(index, e))
}

/// Reads a nullable JSON text column.
pub(crate) fn optional_json_column<T: DeserializeOwned>(
    row: &Row<'_>,
    index: usize,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(index)?;
    raw.map(|raw| serde_json::from_str(&raw).map_err(|e| conversion_error(index, e)))
        .transpose()
}
