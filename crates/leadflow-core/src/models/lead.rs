//! Lead model: the slice of a lead that the status engine reads and writes.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{FieldData, StatusId};

/// Point-in-time `{ id, name }` snapshot of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

impl ProjectRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Immutable record of one transition: the status entered and the data
/// supplied for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    /// Status transitioned into
    pub status_id: StatusId,

    /// Raw values supplied for this transition (not the merged total)
    #[serde(default)]
    pub data: FieldData,

    /// When the transition happened (UTC)
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub changed_at: Timestamp,
}

/// A sales lead as seen by the status engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Opaque lead identifier
    pub id: String,

    /// User the lead is assigned to
    pub owner_id: String,

    /// Users notified of status changes besides the owner
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watchers: Vec<String>,

    /// Project the lead is attached to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,

    /// Current status; `None` until the first transition
    #[serde(default)]
    pub current_status_id: Option<StatusId>,

    /// Cumulative field values from every transition and edit
    #[serde(default)]
    pub custom_data: FieldData,

    /// Append-only transition history, oldest first
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,

    /// Timestamp when the lead was created (UTC)
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub created_at: Timestamp,

    /// Timestamp when the lead was last modified (UTC)
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub updated_at: Timestamp,
}

impl Lead {
    /// The most recent history entry, if any.
    pub fn last_transition(&self) -> Option<&StatusHistoryEntry> {
        self.status_history.last()
    }

    /// Owner followed by watchers, without duplicates.
    pub fn recipients(&self) -> Vec<String> {
        let mut recipients = vec![self.owner_id.clone()];
        for watcher in &self.watchers {
            if !recipients.contains(watcher) {
                recipients.push(watcher.clone());
            }
        }
        recipients
    }
}
