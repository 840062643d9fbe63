//! Moving a lead into a status.

use jiff::Timestamp;
use log::debug;

use super::validate::validate_fields;
use crate::{
    catalog::StatusCatalog,
    error::{Result, WorkflowError},
    models::{Activity, ActivityEntry, FieldData, Lead, StatusDefinition, StatusHistoryEntry, StatusId},
};

/// The three artifacts of a successful transition. The caller commits them,
/// ideally atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    /// Lead with the merged data, new pointer and appended history
    pub lead: Lead,
    /// Entry appended to `lead.status_history`
    pub history_entry: StatusHistoryEntry,
    /// `status_changed` audit entry
    pub activity: ActivityEntry,
}

impl TransitionOutcome {
    /// Status the lead was in before the transition.
    pub fn old_status_id(&self) -> Option<&StatusId> {
        match &self.activity.activity {
            Activity::StatusChanged { old_status_id, .. } => old_status_id.as_ref(),
            _ => None,
        }
    }

    pub fn new_status_id(&self) -> &StatusId {
        &self.history_entry.status_id
    }
}

/// Applies status transitions against a catalog snapshot.
///
/// The engine is pure: it reads the lead and catalog it is given and returns
/// new values. Re-entering the current status is allowed and recorded like
/// any other transition. Leaving a final status is not forbidden.
#[derive(Debug, Clone, Copy)]
pub struct TransitionEngine<'a> {
    catalog: &'a StatusCatalog,
}

impl<'a> TransitionEngine<'a> {
    pub fn new(catalog: &'a StatusCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a StatusCatalog {
        self.catalog
    }

    /// Validates `data` for a transition into `target` without applying it.
    pub fn validate(&self, target: &StatusDefinition, data: &FieldData) -> Result<()> {
        validate_fields(target, data, self.catalog)
    }

    /// Transitions `lead` into `target`, stamped with the current time.
    ///
    /// Supplied values are merged over the lead's data; null values are kept
    /// in the history entry but never overwrite an existing key.
    ///
    /// # Errors
    ///
    /// `SchemaValidation` naming the first offending field. On error no
    /// history or activity entry is produced.
    pub fn transition(
        &self,
        lead: &Lead,
        target: &StatusDefinition,
        data: FieldData,
        actor_id: &str,
    ) -> Result<TransitionOutcome> {
        self.transition_at(lead, target, data, actor_id, Timestamp::now())
    }

    /// Same as [`TransitionEngine::transition`] with an explicit clock.
    ///
    /// `now` is clamped so that `changed_at` never goes backwards within the
    /// lead's history.
    pub fn transition_at(
        &self,
        lead: &Lead,
        target: &StatusDefinition,
        data: FieldData,
        actor_id: &str,
        now: Timestamp,
    ) -> Result<TransitionOutcome> {
        self.validate(target, &data)?;

        let changed_at = lead
            .last_transition()
            .map_or(now, |last| now.max(last.changed_at))
            .max(lead.updated_at);

        let mut updated = lead.clone();
        for (key, value) in data.iter().filter(|(_, value)| !value.is_null()) {
            updated.custom_data.insert(key.clone(), value.clone());
        }

        let history_entry = StatusHistoryEntry {
            status_id: target.id.clone(),
            data,
            changed_at,
        };
        updated.status_history.push(history_entry.clone());

        let old_status_id = updated.current_status_id.replace(target.id.clone());
        updated.updated_at = changed_at;

        let activity = ActivityEntry::new(
            &lead.id,
            Activity::StatusChanged {
                old_status_id,
                new_status_id: target.id.clone(),
            },
            actor_id,
            changed_at,
        );

        debug!(
            "Lead {} moved to status '{}' ({}) by {actor_id}",
            lead.id, target.name, target.id
        );
        Ok(TransitionOutcome {
            lead: updated,
            history_entry,
            activity,
        })
    }

    /// Looks `target_id` up in the catalog and transitions into it.
    ///
    /// # Errors
    ///
    /// `StatusNotFound` if the catalog has no such status.
    pub fn transition_to(
        &self,
        lead: &Lead,
        target_id: &StatusId,
        data: FieldData,
        actor_id: &str,
        now: Timestamp,
    ) -> Result<TransitionOutcome> {
        let target = self
            .catalog
            .get_status(target_id)
            .ok_or_else(|| WorkflowError::StatusNotFound {
                id: target_id.clone(),
            })?;
        self.transition_at(lead, target, data, actor_id, now)
    }
}
