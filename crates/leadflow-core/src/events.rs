//! Change notifications published after successful commits.
//!
//! The engine itself never publishes; [`crate::pipeline::Pipeline`] sends one
//! of these on its broadcast channel after each committed catalog mutation
//! or transition, so live consumers can keep caches current without polling.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    engine::TransitionOutcome,
    models::{StatusDefinition, StatusId},
};

/// A committed change to the status catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    Created { status: StatusDefinition },
    Updated { status: StatusDefinition },
    Deleted { id: StatusId },
}

impl CatalogEvent {
    /// Id of the status the event is about.
    pub fn status_id(&self) -> &StatusId {
        match self {
            CatalogEvent::Created { status } | CatalogEvent::Updated { status } => &status.id,
            CatalogEvent::Deleted { id } => id,
        }
    }
}

/// Notification that a lead entered a status, addressed to its owner and
/// watchers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LeadStatusChanged {
    pub lead_id: String,
    pub old_status_id: Option<StatusId>,
    pub new_status_id: StatusId,
    pub actor_id: String,
    /// Owner first, then watchers, without duplicates
    pub recipients: Vec<String>,
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub changed_at: Timestamp,
}

impl LeadStatusChanged {
    pub fn from_outcome(outcome: &TransitionOutcome) -> Self {
        Self {
            lead_id: outcome.lead.id.clone(),
            old_status_id: outcome.old_status_id().cloned(),
            new_status_id: outcome.new_status_id().clone(),
            actor_id: outcome.activity.actor_id.clone(),
            recipients: outcome.lead.recipients(),
            changed_at: outcome.history_entry.changed_at,
        }
    }
}

/// Everything the pipeline broadcasts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Catalog change, with the catalog version it produced
    Catalog { version: u64, event: CatalogEvent },
    LeadStatusChanged(LeadStatusChanged),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        catalog::StatusCatalog,
        engine::{create_lead_at, TransitionEngine},
        models::FieldData,
        params::{CreateStatus, NewLead},
    };

    #[test]
    fn test_status_changed_addresses_owner_and_watchers() {
        let mut catalog = StatusCatalog::new();
        let new = catalog
            .create_status(CreateStatus {
                name: "New".to_string(),
                ..Default::default()
            })
            .unwrap();
        let now = Timestamp::from_second(1_640_995_200).unwrap();
        let lead = create_lead_at(
            NewLead {
                owner_id: "u1".to_string(),
                watchers: vec!["u2".to_string(), "u1".to_string()],
                ..Default::default()
            },
            "u1",
            now,
        )
        .unwrap()
        .lead;

        let outcome = TransitionEngine::new(&catalog)
            .transition_at(&lead, &new, FieldData::new(), "u3", now)
            .unwrap();
        let event = LeadStatusChanged::from_outcome(&outcome);

        assert_eq!(event.lead_id, lead.id);
        assert_eq!(event.old_status_id, None);
        assert_eq!(event.new_status_id, new.id);
        assert_eq!(event.actor_id, "u3");
        assert_eq!(event.recipients, vec!["u1".to_string(), "u2".to_string()]);
    }

    #[test]
    fn test_catalog_event_wire_shape() {
        let event = PipelineEvent::Catalog {
            version: 4,
            event: CatalogEvent::Deleted {
                id: StatusId::from("st-9"),
            },
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "kind": "catalog", "version": 4, "event": { "type": "deleted", "id": "st-9" } })
        );
    }
}
