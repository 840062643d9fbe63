//! Lead operations other than status transitions: creation, transfer and
//! free-form edits. Each returns the new lead together with its audit entry.

use jiff::Timestamp;
use log::debug;
use serde_json::Value;

use crate::{
    catalog::StatusCatalog,
    error::{Result, WorkflowError},
    models::{Activity, ActivityEntry, FieldData, Lead, TransferDetails},
    params::{NewLead, Transfer},
};

/// Key under which a snapshot records the status name of the moment.
pub const SNAPSHOT_STATUS_KEY: &str = "status";

/// A changed lead and the entry describing the change.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadChange {
    pub lead: Lead,
    pub activity: ActivityEntry,
}

/// Field values of `lead` as an audit snapshot: its custom data plus the
/// name of its current status, resolved now.
pub fn snapshot(lead: &Lead, catalog: &StatusCatalog) -> FieldData {
    let mut data = lead.custom_data.clone();
    if let Some(name) = lead
        .current_status_id
        .as_ref()
        .and_then(|id| catalog.name_of(id))
    {
        data.insert(SNAPSHOT_STATUS_KEY.to_string(), Value::String(name.to_string()));
    }
    data
}

fn require_user(field: &str, user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(WorkflowError::invalid_input(field).with_reason("user id must not be empty"));
    }
    Ok(())
}

/// Creates a lead with no status yet.
pub fn create_lead(params: NewLead, actor_id: &str) -> Result<LeadChange> {
    create_lead_at(params, actor_id, Timestamp::now())
}

pub fn create_lead_at(params: NewLead, actor_id: &str, now: Timestamp) -> Result<LeadChange> {
    require_user("owner_id", &params.owner_id)?;

    let mut custom_data = params.data;
    custom_data.retain(|_, value| !value.is_null());

    let lead = Lead {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: params.owner_id,
        watchers: params.watchers,
        project: params.project,
        current_status_id: None,
        custom_data,
        status_history: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    let activity = ActivityEntry::new(
        &lead.id,
        Activity::Created {
            initial_data: lead.custom_data.clone(),
        },
        actor_id,
        now,
    );

    debug!("Created lead {} for owner {}", lead.id, lead.owner_id);
    Ok(LeadChange { lead, activity })
}

/// Hands `lead` to another owner and optionally another project.
///
/// # Errors
///
/// `InvalidInput` if the target user is empty, or if neither the owner nor
/// the project would change.
pub fn transfer_lead(lead: &Lead, transfer: Transfer, actor_id: &str) -> Result<LeadChange> {
    transfer_lead_at(lead, transfer, actor_id, Timestamp::now())
}

pub fn transfer_lead_at(
    lead: &Lead,
    transfer: Transfer,
    actor_id: &str,
    now: Timestamp,
) -> Result<LeadChange> {
    require_user("to_user_id", &transfer.to_user_id)?;

    let new_project = transfer.new_project.or_else(|| lead.project.clone());
    if transfer.to_user_id == lead.owner_id && new_project == lead.project {
        return Err(WorkflowError::invalid_input("to_user_id").with_reason(format!(
            "lead is already owned by {} in the same project",
            lead.owner_id
        )));
    }

    let timestamp = now.max(lead.updated_at);
    let details = TransferDetails {
        from_user_id: lead.owner_id.clone(),
        to_user_id: transfer.to_user_id.clone(),
        old_project_ref: lead.project.clone(),
        new_project_ref: new_project.clone(),
        reason: transfer.reason,
        notes: transfer.notes,
    };

    let mut updated = lead.clone();
    updated.owner_id = transfer.to_user_id;
    updated.project = new_project;
    updated.updated_at = timestamp;

    let activity = ActivityEntry::new(&lead.id, Activity::Transferred(details), actor_id, timestamp);
    debug!(
        "Transferred lead {} from {} to {}",
        lead.id, lead.owner_id, updated.owner_id
    );
    Ok(LeadChange {
        lead: updated,
        activity,
    })
}

/// Merges `changes` into the lead's custom data. A `null` value removes the
/// key. The entry carries full before/after snapshots.
///
/// # Errors
///
/// `InvalidInput` if `changes` is empty or leaves the data as it was.
pub fn update_lead(
    lead: &Lead,
    changes: FieldData,
    catalog: &StatusCatalog,
    actor_id: &str,
) -> Result<LeadChange> {
    update_lead_at(lead, changes, catalog, actor_id, Timestamp::now())
}

pub fn update_lead_at(
    lead: &Lead,
    changes: FieldData,
    catalog: &StatusCatalog,
    actor_id: &str,
    now: Timestamp,
) -> Result<LeadChange> {
    if changes.is_empty() {
        return Err(WorkflowError::invalid_input("changes").with_reason("nothing to update"));
    }

    let old_data = snapshot(lead, catalog);
    let mut updated = lead.clone();
    for (key, value) in changes {
        if value.is_null() {
            updated.custom_data.remove(&key);
        } else {
            updated.custom_data.insert(key, value);
        }
    }
    if updated.custom_data == lead.custom_data {
        return Err(WorkflowError::invalid_input("changes")
            .with_reason("values match the lead's current data"));
    }
    let timestamp = now.max(lead.updated_at);
    updated.updated_at = timestamp;
    let new_data = snapshot(&updated, catalog);

    let activity = ActivityEntry::new(
        &lead.id,
        Activity::Updated { old_data, new_data },
        actor_id,
        timestamp,
    );
    debug!("Updated data of lead {}", lead.id);
    Ok(LeadChange {
        lead: updated,
        activity,
    })
}
