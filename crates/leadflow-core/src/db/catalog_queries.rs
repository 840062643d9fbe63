//! Catalog load/save with a compare-and-swap on the catalog version.

use log::debug;
use rusqlite::{params, Connection, TransactionBehavior};

use super::{json_column, optional_json_column, timestamp_column};
use crate::{
    catalog::StatusCatalog,
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{StatusDefinition, StatusId},
};

const SELECT_VERSION_SQL: &str = "SELECT version FROM catalog_meta WHERE id = 1";
const UPDATE_VERSION_SQL: &str = "UPDATE catalog_meta SET version = ?1 WHERE id = 1";
const SELECT_STATUSES_SQL: &str = "SELECT id, name, fields, is_final, is_default, is_site_visit_done, prior_fields, created_at, updated_at FROM statuses ORDER BY position";
const DELETE_STATUSES_SQL: &str = "DELETE FROM statuses";
const INSERT_STATUS_SQL: &str = "INSERT INTO statuses (id, position, name, fields, is_final, is_default, is_site_visit_done, prior_fields, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

fn stored_version(conn: &Connection) -> Result<u64> {
    conn.query_row(SELECT_VERSION_SQL, [], |row| row.get::<_, i64>(0))
        .map(|v| v as u64)
        .db_context("Failed to read catalog version")
}

/// Reads the whole catalog through `conn` (a plain connection or an open
/// transaction).
pub(crate) fn read_catalog(conn: &Connection) -> Result<StatusCatalog> {
    let version = stored_version(conn)?;

    let mut stmt = conn
        .prepare(SELECT_STATUSES_SQL)
        .db_context("Failed to prepare status query")?;
    let statuses = stmt
        .query_map([], |row| {
            Ok(StatusDefinition {
                id: StatusId::from(row.get::<_, String>(0)?),
                name: row.get(1)?,
                fields: json_column(row, 2)?,
                is_final: row.get(3)?,
                is_default: row.get(4)?,
                is_site_visit_done: row.get(5)?,
                prior_fields: optional_json_column(row, 6)?,
                created_at: timestamp_column(row, 7)?,
                updated_at: timestamp_column(row, 8)?,
            })
        })
        .db_context("Failed to query statuses")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read status row")?;

    StatusCatalog::from_parts(version, statuses)
}

/// Replaces the stored catalog with `catalog`, version included.
fn write_catalog(conn: &Connection, catalog: &StatusCatalog) -> Result<()> {
    conn.execute(DELETE_STATUSES_SQL, [])
        .db_context("Failed to clear statuses")?;

    let mut stmt = conn
        .prepare(INSERT_STATUS_SQL)
        .db_context("Failed to prepare status insert")?;
    for (position, status) in catalog.iter().enumerate() {
        let fields = serde_json::to_string(&status.fields)?;
        let prior_fields = status
            .prior_fields
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        stmt.execute(params![
            status.id.as_str(),
            position as i64,
            status.name,
            fields,
            status.is_final,
            status.is_default,
            status.is_site_visit_done,
            prior_fields,
            status.created_at.to_string(),
            status.updated_at.to_string(),
        ])
        .db_context("Failed to insert status")?;
    }

    conn.execute(UPDATE_VERSION_SQL, params![catalog.version() as i64])
        .db_context("Failed to update catalog version")?;
    Ok(())
}

impl super::Database {
    /// Loads the current catalog.
    pub fn load_catalog(&self) -> Result<StatusCatalog> {
        read_catalog(&self.connection)
    }

    /// Stores `catalog` if the stored version still equals
    /// `expected_version`, the version the caller originally loaded.
    ///
    /// # Errors
    ///
    /// `VersionConflict` if another writer committed in between.
    pub fn save_catalog(&mut self, catalog: &StatusCatalog, expected_version: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let actual = stored_version(&tx)?;
        if actual != expected_version {
            return Err(WorkflowError::VersionConflict {
                expected: expected_version,
                actual,
            });
        }
        write_catalog(&tx, catalog)?;

        tx.commit().db_context("Failed to commit transaction")?;
        debug!("Saved catalog at version {}", catalog.version());
        Ok(())
    }

    /// Loads the catalog, applies `f` and saves the result, all inside one
    /// immediate transaction. Nothing is written if `f` fails.
    ///
    /// Returns `f`'s value together with the catalog as committed.
    pub fn modify_catalog<T, F>(&mut self, f: F) -> Result<(T, StatusCatalog)>
    where
        F: FnOnce(&mut StatusCatalog) -> Result<T>,
    {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let mut catalog = read_catalog(&tx)?;
        let value = f(&mut catalog)?;
        write_catalog(&tx, &catalog)?;

        tx.commit().db_context("Failed to commit transaction")?;
        debug!("Committed catalog version {}", catalog.version());
        Ok((value, catalog))
    }
}
