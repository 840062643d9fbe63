//! Lead operations for the Pipeline.

use jiff::{tz::TimeZone, Zoned};
use log::info;

use super::Pipeline;
use crate::{
    audit::AuditLog,
    engine::{LeadChange, TransitionOutcome},
    error::Result,
    events::{LeadStatusChanged, PipelineEvent},
    models::Lead,
    params::{CreateLead, FollowUps, LeadRef, ListLeads, TransferLead, TransitionLead, UpdateLead},
    projections::{partition_follow_ups, FollowUpBuckets},
};

impl Pipeline {
    /// Creates a lead with no status and records its `created` entry.
    pub async fn create_lead(&self, params: &CreateLead) -> Result<Lead> {
        let params = params.clone();
        let change = self
            .with_database(move |db| db.create_lead(&params))
            .await?;
        info!("Created lead {}", change.lead.id);
        Ok(change.lead)
    }

    /// Retrieves a lead, with its status history, by its ID.
    pub async fn get_lead(&self, params: &LeadRef) -> Result<Option<Lead>> {
        let id = params.id.clone();
        self.with_database(move |db| db.get_lead(&id)).await
    }

    /// Lists leads matching the filter, oldest first.
    pub async fn list_leads(&self, params: &ListLeads) -> Result<Vec<Lead>> {
        let filter = params.clone();
        self.with_database(move |db| db.list_leads(&filter)).await
    }

    /// Validates and commits a status transition, then notifies subscribers.
    ///
    /// Nothing is written or published when validation fails.
    pub async fn transition_lead(&self, params: &TransitionLead) -> Result<TransitionOutcome> {
        let params = params.clone();
        let outcome = self
            .with_database(move |db| db.transition_lead(&params))
            .await?;

        info!(
            "Lead {} moved to status {}",
            outcome.lead.id,
            outcome.new_status_id()
        );
        self.publish(PipelineEvent::LeadStatusChanged(
            LeadStatusChanged::from_outcome(&outcome),
        ));
        Ok(outcome)
    }

    /// Reassigns a lead to another owner and optionally another project.
    pub async fn transfer_lead(&self, params: &TransferLead) -> Result<LeadChange> {
        let params = params.clone();
        self.with_database(move |db| db.transfer_lead(&params)).await
    }

    /// Merges non-status edits into a lead's data.
    pub async fn update_lead(&self, params: &UpdateLead) -> Result<LeadChange> {
        let params = params.clone();
        self.with_database(move |db| db.update_lead(&params)).await
    }

    /// Loads a lead's activity log in append order.
    pub async fn audit_log(&self, params: &LeadRef) -> Result<AuditLog> {
        let id = params.id.clone();
        self.with_database(move |db| db.load_audit_log(&id)).await
    }

    /// Partitions every lead with a follow-up date into overdue, today,
    /// tomorrow and upcoming buckets, relative to the given date or today in
    /// the system time zone.
    pub async fn follow_ups(&self, params: &FollowUps) -> Result<FollowUpBuckets> {
        let reference = match params.parsed_date()? {
            Some(date) => date,
            None => Zoned::now().date(),
        };
        let leads = self.list_leads(&ListLeads::default()).await?;
        Ok(partition_follow_ups(&leads, reference, &TimeZone::system()))
    }
}
