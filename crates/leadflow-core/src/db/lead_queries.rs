//! Lead rows, status history and activity entries.

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::{catalog_queries::read_catalog, json_column, optional_json_column, timestamp_column};
use crate::{
    audit::AuditLog,
    engine::{self, LeadChange, TransitionEngine, TransitionOutcome},
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{ActivityEntry, Lead, StatusHistoryEntry, StatusId},
    params::{CreateLead, ListLeads, TransferLead, TransitionLead, UpdateLead},
};

const INSERT_LEAD_SQL: &str = "INSERT INTO leads (id, owner_id, watchers, project, current_status_id, custom_data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const LEAD_COLUMNS: &str =
    "id, owner_id, watchers, project, current_status_id, custom_data, created_at, updated_at";
const UPDATE_LEAD_SQL: &str = "UPDATE leads SET owner_id = ?1, watchers = ?2, project = ?3, current_status_id = ?4, custom_data = ?5, updated_at = ?6 WHERE id = ?7";
const UPDATE_LEAD_STATUS_SQL: &str =
    "UPDATE leads SET current_status_id = ?1, custom_data = ?2, updated_at = ?3 WHERE id = ?4";
const INSERT_HISTORY_SQL: &str =
    "INSERT INTO status_history (lead_id, status_id, data, changed_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_HISTORY_SQL: &str =
    "SELECT status_id, data, changed_at FROM status_history WHERE lead_id = ?1 ORDER BY seq";
const INSERT_ACTIVITY_SQL: &str = "INSERT INTO activities (id, lead_id, action, payload, actor_id, timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_ACTIVITIES_SQL: &str =
    "SELECT id, lead_id, payload, actor_id, timestamp FROM activities WHERE lead_id = ?1 ORDER BY seq";
const CHECK_LEAD_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM leads WHERE id = ?1)";

fn read_history(conn: &Connection, lead_id: &str) -> Result<Vec<StatusHistoryEntry>> {
    let mut stmt = conn
        .prepare(SELECT_HISTORY_SQL)
        .db_context("Failed to prepare history query")?;
    let history = stmt
        .query_map(params![lead_id], |row| {
            Ok(StatusHistoryEntry {
                status_id: StatusId::from(row.get::<_, String>(0)?),
                data: json_column(row, 1)?,
                changed_at: timestamp_column(row, 2)?,
            })
        })
        .db_context("Failed to query status history")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read status history row")?;
    Ok(history)
}

fn lead_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        watchers: json_column(row, 2)?,
        project: optional_json_column(row, 3)?,
        current_status_id: row.get::<_, Option<String>>(4)?.map(StatusId::from),
        custom_data: json_column(row, 5)?,
        status_history: Vec::new(),
        created_at: timestamp_column(row, 6)?,
        updated_at: timestamp_column(row, 7)?,
    })
}

fn read_lead(conn: &Connection, id: &str) -> Result<Option<Lead>> {
    let lead = conn
        .query_row(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
            params![id],
            lead_from_row,
        )
        .optional()
        .db_context("Failed to query lead")?;

    match lead {
        Some(mut lead) => {
            lead.status_history = read_history(conn, &lead.id)?;
            Ok(Some(lead))
        }
        None => Ok(None),
    }
}

fn require_lead(conn: &Connection, id: &str) -> Result<Lead> {
    read_lead(conn, id)?.ok_or_else(|| WorkflowError::LeadNotFound { id: id.to_string() })
}

fn insert_activity(conn: &Connection, entry: &ActivityEntry) -> Result<()> {
    let payload = serde_json::to_string(&entry.activity)?;
    conn.execute(
        INSERT_ACTIVITY_SQL,
        params![
            entry.id,
            entry.lead_id,
            entry.action().as_str(),
            payload,
            entry.actor_id,
            entry.timestamp.to_string(),
        ],
    )
    .db_context("Failed to insert activity")?;
    Ok(())
}

fn write_lead(conn: &Connection, lead: &Lead) -> Result<()> {
    let changed = conn
        .execute(
            UPDATE_LEAD_SQL,
            params![
                lead.owner_id,
                serde_json::to_string(&lead.watchers)?,
                lead.project.as_ref().map(serde_json::to_string).transpose()?,
                lead.current_status_id.as_ref().map(StatusId::as_str),
                serde_json::to_string(&lead.custom_data)?,
                lead.updated_at.to_string(),
                lead.id,
            ],
        )
        .db_context("Failed to update lead")?;
    if changed == 0 {
        return Err(WorkflowError::LeadNotFound {
            id: lead.id.clone(),
        });
    }
    Ok(())
}

/// History row, then the lead pointer, then the activity row.
fn write_transition(conn: &Connection, outcome: &TransitionOutcome) -> Result<()> {
    let lead = &outcome.lead;
    let entry = &outcome.history_entry;

    conn.execute(
        INSERT_HISTORY_SQL,
        params![
            lead.id,
            entry.status_id.as_str(),
            serde_json::to_string(&entry.data)?,
            entry.changed_at.to_string(),
        ],
    )
    .db_context("Failed to insert status history")?;

    let changed = conn
        .execute(
            UPDATE_LEAD_STATUS_SQL,
            params![
                entry.status_id.as_str(),
                serde_json::to_string(&lead.custom_data)?,
                lead.updated_at.to_string(),
                lead.id,
            ],
        )
        .db_context("Failed to update lead status")?;
    if changed == 0 {
        return Err(WorkflowError::LeadNotFound {
            id: lead.id.clone(),
        });
    }

    insert_activity(conn, &outcome.activity)
}

impl super::Database {
    /// Stores a newly created lead together with its `created` entry.
    pub fn insert_lead(&mut self, change: &LeadChange) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let lead = &change.lead;
        tx.execute(
            INSERT_LEAD_SQL,
            params![
                lead.id,
                lead.owner_id,
                serde_json::to_string(&lead.watchers)?,
                lead.project.as_ref().map(serde_json::to_string).transpose()?,
                lead.current_status_id.as_ref().map(StatusId::as_str),
                serde_json::to_string(&lead.custom_data)?,
                lead.created_at.to_string(),
                lead.updated_at.to_string(),
            ],
        )
        .db_context("Failed to insert lead")?;
        for entry in &lead.status_history {
            tx.execute(
                INSERT_HISTORY_SQL,
                params![
                    lead.id,
                    entry.status_id.as_str(),
                    serde_json::to_string(&entry.data)?,
                    entry.changed_at.to_string(),
                ],
            )
            .db_context("Failed to insert status history")?;
        }
        insert_activity(&tx, &change.activity)?;

        tx.commit().db_context("Failed to commit transaction")?;
        debug!("Stored lead {}", lead.id);
        Ok(())
    }

    /// Retrieves a lead with its full status history.
    pub fn get_lead(&self, id: &str) -> Result<Option<Lead>> {
        read_lead(&self.connection, id)
    }

    /// Lists leads, oldest first, with their histories.
    pub fn list_leads(&self, filter: &ListLeads) -> Result<Vec<Lead>> {
        let mut query = format!("SELECT {LEAD_COLUMNS} FROM leads");
        let mut conditions = Vec::new();
        let mut params_vec: Vec<&dyn rusqlite::ToSql> = Vec::new();

        if let Some(owner) = &filter.owner_id {
            conditions.push("owner_id = ?");
            params_vec.push(owner);
        }
        if let Some(status) = &filter.status_id {
            conditions.push("current_status_id = ?");
            params_vec.push(status);
        }
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at, id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare lead query")?;
        let mut leads = stmt
            .query_map(&params_vec[..], lead_from_row)
            .db_context("Failed to query leads")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read lead row")?;

        for lead in &mut leads {
            lead.status_history = read_history(&self.connection, &lead.id)?;
        }
        Ok(leads)
    }

    /// Commits the three artifacts of a transition atomically.
    pub fn commit_transition(&mut self, outcome: &TransitionOutcome) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;
        write_transition(&tx, outcome)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Commits a transfer or edit: the changed lead row and its entry.
    pub fn commit_lead_change(&mut self, change: &LeadChange) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;
        write_lead(&tx, &change.lead)?;
        insert_activity(&tx, &change.activity)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// The activity log of a lead, oldest first.
    pub fn load_audit_log(&self, lead_id: &str) -> Result<AuditLog> {
        let exists: bool = self
            .connection
            .query_row(CHECK_LEAD_EXISTS_SQL, params![lead_id], |row| row.get(0))
            .db_context("Failed to check lead existence")?;
        if !exists {
            return Err(WorkflowError::LeadNotFound {
                id: lead_id.to_string(),
            });
        }

        let mut stmt = self
            .connection
            .prepare(SELECT_ACTIVITIES_SQL)
            .db_context("Failed to prepare activity query")?;
        let entries = stmt
            .query_map(params![lead_id], |row| {
                Ok(ActivityEntry {
                    id: row.get(0)?,
                    lead_id: row.get(1)?,
                    activity: json_column(row, 2)?,
                    actor_id: row.get(3)?,
                    timestamp: timestamp_column(row, 4)?,
                })
            })
            .db_context("Failed to query activities")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read activity row")?;

        AuditLog::from_entries(lead_id, entries)
    }

    /// Creates a lead and stores it.
    pub fn create_lead(&mut self, params: &CreateLead) -> Result<LeadChange> {
        let change = engine::create_lead(params.lead.clone(), &params.actor_id)?;
        self.insert_lead(&change)?;
        Ok(change)
    }

    /// Reads the lead and catalog, runs the transition and commits it, all
    /// within one immediate transaction.
    pub fn transition_lead(&mut self, params: &TransitionLead) -> Result<TransitionOutcome> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let catalog = read_catalog(&tx)?;
        let lead = require_lead(&tx, &params.lead_id)?;
        let outcome = TransitionEngine::new(&catalog).transition_to(
            &lead,
            &StatusId::from(params.status_id.as_str()),
            params.data.clone(),
            &params.actor_id,
            Timestamp::now(),
        )?;
        write_transition(&tx, &outcome)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(outcome)
    }

    /// Transfers a lead within one immediate transaction.
    pub fn transfer_lead(&mut self, params: &TransferLead) -> Result<LeadChange> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let lead = require_lead(&tx, &params.lead_id)?;
        let change = engine::transfer_lead(&lead, params.transfer.clone(), &params.actor_id)?;
        write_lead(&tx, &change.lead)?;
        insert_activity(&tx, &change.activity)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(change)
    }

    /// Applies a free-form edit within one immediate transaction.
    pub fn update_lead(&mut self, params: &UpdateLead) -> Result<LeadChange> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let catalog = read_catalog(&tx)?;
        let lead = require_lead(&tx, &params.lead_id)?;
        let change = engine::update_lead(&lead, params.changes.clone(), &catalog, &params.actor_id)?;
        write_lead(&tx, &change.lead)?;
        insert_activity(&tx, &change.activity)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(change)
    }
}
