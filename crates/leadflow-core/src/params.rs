//! Parameter structures for leadflow operations
//!
//! These structures are shared by every interface (CLI, MCP, direct library
//! use) and carry no framework-specific derives beyond serde and the optional
//! `schema` feature. Interface layers wrap or convert into them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Engine-level requests ([`NewLead`], [`Transfer`], [`StatusPatch`]) carry no
//! lead id or actor; the service-level structs flatten them and add those.

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorkflowError},
    models::{FieldData, FieldSchema, ProjectRef},
};

fn default_actor() -> String {
    "system".to_string()
}

/// Parameters for operations addressing a single status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StatusRef {
    /// The ID of the status
    pub id: String,
}

/// Parameters for creating a new status definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateStatus {
    /// Unique status name (required)
    pub name: String,
    /// Data-entry fields; ignored when `is_final` is set
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    /// Marks the terminal status of the pipeline
    #[serde(default)]
    pub is_final: bool,
    /// Marks the suggested first status for new leads
    #[serde(default)]
    pub is_default: bool,
    /// Marks the status recorded after a site visit
    #[serde(default)]
    pub is_site_visit_done: bool,
}

/// Partial changes to a status definition. `None` leaves a value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    /// New unique name
    pub name: Option<String>,
    /// Replacement field list
    pub fields: Option<Vec<FieldSchema>>,
    pub is_final: Option<bool>,
    pub is_default: Option<bool>,
    pub is_site_visit_done: Option<bool>,
}

impl StatusPatch {
    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.fields.is_none()
            && self.is_final.is_none()
            && self.is_default.is_none()
            && self.is_site_visit_done.is_none()
    }
}

/// Parameters for updating an existing status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateStatus {
    /// ID of the status to update
    pub id: String,
    /// Changes to apply
    #[serde(flatten)]
    pub patch: StatusPatch,
}

/// Parameters for deleting a status.
///
/// Deletion does not touch leads that reference the status; their history
/// keeps the orphaned id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeleteStatus {
    /// ID of the status to delete
    pub id: String,
    /// Must be true to proceed
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for operations addressing a single lead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct LeadRef {
    /// The ID of the lead
    pub id: String,
}

/// Filters for listing leads. Empty filters list everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ListLeads {
    /// Only leads owned by this user
    pub owner_id: Option<String>,
    /// Only leads currently in this status
    pub status_id: Option<String>,
}

/// A lead to be created. It starts with no status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    /// User the lead is assigned to
    pub owner_id: String,
    /// Additional users notified of status changes
    #[serde(default)]
    pub watchers: Vec<String>,
    /// Project the lead belongs to
    pub project: Option<ProjectRef>,
    /// Initial field values (name, email, phone, ...)
    #[serde(default)]
    pub data: FieldData,
}

/// Parameters for creating a lead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateLead {
    #[serde(flatten)]
    pub lead: NewLead,
    /// User performing the operation
    #[serde(default = "default_actor")]
    pub actor_id: String,
}

/// Parameters for moving a lead to a status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TransitionLead {
    /// Lead to move
    pub lead_id: String,
    /// Target status
    pub status_id: String,
    /// Values for the target status's fields
    #[serde(default)]
    pub data: FieldData,
    /// User performing the operation
    #[serde(default = "default_actor")]
    pub actor_id: String,
}

/// A change of owner and, optionally, project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// New owner
    pub to_user_id: String,
    /// New project; `None` keeps the current one
    pub new_project: Option<ProjectRef>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Parameters for transferring a lead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TransferLead {
    /// Lead to transfer
    pub lead_id: String,
    #[serde(flatten)]
    pub transfer: Transfer,
    /// User performing the operation
    #[serde(default = "default_actor")]
    pub actor_id: String,
}

/// Parameters for a non-status edit of a lead's data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateLead {
    /// Lead to edit
    pub lead_id: String,
    /// Values to merge; a null value removes the key
    pub changes: FieldData,
    /// User performing the operation
    #[serde(default = "default_actor")]
    pub actor_id: String,
}

/// Parameters for the follow-up projection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FollowUps {
    /// Reference date (YYYY-MM-DD); defaults to today in the system timezone
    pub reference_date: Option<String>,
}

impl FollowUps {
    /// Parses the reference date, if one was given.
    pub fn parsed_date(&self) -> Result<Option<Date>> {
        self.reference_date
            .as_deref()
            .map(|raw| {
                raw.parse::<Date>().map_err(|e| {
                    WorkflowError::invalid_input("reference_date")
                        .with_reason(format!("expected YYYY-MM-DD: {e}"))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_status_flattens_patch() {
        let params: UpdateStatus = serde_json::from_str(
            r#"{ "id": "st-1", "name": "Negotiation", "isFinal": true }"#,
        )
        .unwrap();
        assert_eq!(params.id, "st-1");
        assert_eq!(params.patch.name.as_deref(), Some("Negotiation"));
        assert_eq!(params.patch.is_final, Some(true));
        assert!(params.patch.fields.is_none());
        assert!(!params.patch.is_empty());
    }

    #[test]
    fn test_actor_defaults_to_system() {
        let params: TransitionLead =
            serde_json::from_str(r#"{ "leadId": "l1", "statusId": "s1" }"#).unwrap();
        assert_eq!(params.actor_id, "system");
        assert!(params.data.is_empty());
    }

    #[test]
    fn test_follow_up_date_parsing() {
        let ok = FollowUps {
            reference_date: Some("2024-03-01".to_string()),
        };
        assert_eq!(ok.parsed_date().unwrap(), Some(jiff::civil::date(2024, 3, 1)));

        let bad = FollowUps {
            reference_date: Some("March 1st".to_string()),
        };
        assert!(bad.parsed_date().is_err());
        assert_eq!(FollowUps::default().parsed_date().unwrap(), None);
    }
}
