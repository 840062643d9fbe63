//! Lead handler operations that return display wrapper types.

use super::Pipeline;
use crate::{
    audit::{ActivityFormatter, DetailView},
    catalog::StatusCatalog,
    display::{ActivityFeed, CreateResult, LeadView, Leads, UpdateResult},
    error::Result,
    models::ActivityEntry,
    params::{CreateLead, FollowUps, LeadRef, ListLeads, TransferLead, TransitionLead, UpdateLead},
    projections::FollowUpBuckets,
};

/// Change lines for an update result: the activity's summary followed by
/// the rows that actually changed.
fn change_lines(entry: &ActivityEntry, catalog: &StatusCatalog) -> Vec<String> {
    let summary = ActivityFormatter::new(catalog).describe(entry);
    let mut lines = vec![summary.text];
    match summary.detail_view {
        DetailView::Diff(rows) => lines.extend(
            rows.iter()
                .filter(|row| row.changed())
                .map(|row| format!("{}: {} → {}", row.label, row.old, row.new)),
        ),
        DetailView::Transfer(rows) => lines.extend(
            rows.iter()
                .map(|row| format!("{}: {}", row.label, row.value)),
        ),
        DetailView::Snapshot(_) | DetailView::StatusChange { .. } => {}
    }
    lines
}

impl Pipeline {
    /// Handle creating a lead.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use leadflow_core::{params::{CreateLead, NewLead}, PipelineBuilder};
    /// # async {
    /// let pipeline = PipelineBuilder::new().build().await?;
    /// let params = CreateLead {
    ///     lead: NewLead { owner_id: "u1".into(), ..Default::default() },
    ///     actor_id: "u1".into(),
    /// };
    /// let created = pipeline.create_lead_result(&params).await?;
    /// println!("{created}");
    /// # Result::<(), leadflow_core::WorkflowError>::Ok(())
    /// # };
    /// ```
    pub async fn create_lead_result(&self, params: &CreateLead) -> Result<CreateResult<LeadView>> {
        let lead = self.create_lead(params).await?;
        let catalog = self.catalog().await?;
        Ok(CreateResult::new(LeadView::new(lead, catalog)))
    }

    /// Handle showing a lead with its status history.
    pub async fn show_lead(&self, params: &LeadRef) -> Result<Option<LeadView>> {
        let Some(lead) = self.get_lead(params).await? else {
            return Ok(None);
        };
        let catalog = self.catalog().await?;
        Ok(Some(LeadView::new(lead, catalog)))
    }

    /// Handle listing leads.
    pub async fn list_leads_result(&self, params: &ListLeads) -> Result<Leads> {
        let leads = self.list_leads(params).await?;
        let catalog = self.catalog().await?;
        Ok(Leads::new(leads, catalog))
    }

    /// Handle moving a lead to a status.
    pub async fn transition_lead_result(
        &self,
        params: &TransitionLead,
    ) -> Result<UpdateResult<LeadView>> {
        let outcome = self.transition_lead(params).await?;
        let catalog = self.catalog().await?;
        let mut changes = change_lines(&outcome.activity, &catalog);
        changes.extend(
            outcome
                .history_entry
                .data
                .keys()
                .map(|key| format!("Recorded {key}")),
        );
        Ok(UpdateResult::with_changes(
            LeadView::new(outcome.lead, catalog),
            changes,
        ))
    }

    /// Handle transferring a lead.
    pub async fn transfer_lead_result(
        &self,
        params: &TransferLead,
    ) -> Result<UpdateResult<LeadView>> {
        let change = self.transfer_lead(params).await?;
        let catalog = self.catalog().await?;
        let changes = change_lines(&change.activity, &catalog);
        Ok(UpdateResult::with_changes(
            LeadView::new(change.lead, catalog),
            changes,
        ))
    }

    /// Handle editing a lead's data.
    pub async fn update_lead_result(&self, params: &UpdateLead) -> Result<UpdateResult<LeadView>> {
        let change = self.update_lead(params).await?;
        let catalog = self.catalog().await?;
        let changes = change_lines(&change.activity, &catalog);
        Ok(UpdateResult::with_changes(
            LeadView::new(change.lead, catalog),
            changes,
        ))
    }

    /// Handle showing a lead's activity, rendered against the current
    /// catalog.
    pub async fn lead_activity(&self, params: &LeadRef) -> Result<ActivityFeed> {
        let log = self.audit_log(params).await?;
        let catalog = self.catalog().await?;
        Ok(ActivityFeed::new(log.into_entries(), catalog))
    }

    /// Handle the follow-up projection.
    pub async fn follow_ups_result(&self, params: &FollowUps) -> Result<FollowUpBuckets> {
        self.follow_ups(params).await
    }
}
