//! Audit log entries.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{FieldData, ProjectRef, StatusId};

/// Kind of lead-affecting action an entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    StatusChanged,
    Transferred,
    Updated,
}

impl ActivityAction {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Created => "created",
            ActivityAction::StatusChanged => "status_changed",
            ActivityAction::Transferred => "transferred",
            ActivityAction::Updated => "updated",
        }
    }
}

impl FromStr for ActivityAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ActivityAction::Created),
            "status_changed" => Ok(ActivityAction::StatusChanged),
            "transferred" => Ok(ActivityAction::Transferred),
            "updated" => Ok(ActivityAction::Updated),
            _ => Err(format!("Invalid activity action: {s}")),
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `transferred` entry. Project snapshots are captured at
/// transfer time and never re-resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TransferDetails {
    pub from_user_id: String,
    pub to_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_project_ref: Option<ProjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_project_ref: Option<ProjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Action tag plus its action-specific details.
///
/// Serialized as `{ "action": "...", "details": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "action", content = "details", rename_all = "snake_case")]
pub enum Activity {
    #[serde(rename_all = "camelCase")]
    Created { initial_data: FieldData },
    /// Status ids are resolved to names only at display time
    #[serde(rename_all = "camelCase")]
    StatusChanged {
        old_status_id: Option<StatusId>,
        new_status_id: StatusId,
    },
    Transferred(TransferDetails),
    #[serde(rename_all = "camelCase")]
    Updated { old_data: FieldData, new_data: FieldData },
}

impl Activity {
    pub fn action(&self) -> ActivityAction {
        match self {
            Activity::Created { .. } => ActivityAction::Created,
            Activity::StatusChanged { .. } => ActivityAction::StatusChanged,
            Activity::Transferred(_) => ActivityAction::Transferred,
            Activity::Updated { .. } => ActivityAction::Updated,
        }
    }
}

/// Immutable audit record of one lead-affecting action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Entry identifier
    pub id: String,

    /// Lead the entry belongs to
    pub lead_id: String,

    /// What happened
    pub activity: Activity,

    /// User who caused the entry
    pub actor_id: String,

    /// When the entry was created (UTC)
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub timestamp: Timestamp,
}

impl ActivityEntry {
    /// Creates an entry with a fresh id.
    pub fn new(
        lead_id: impl Into<String>,
        activity: Activity,
        actor_id: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            lead_id: lead_id.into(),
            activity,
            actor_id: actor_id.into(),
            timestamp,
        }
    }

    pub fn action(&self) -> ActivityAction {
        self.activity.action()
    }
}
