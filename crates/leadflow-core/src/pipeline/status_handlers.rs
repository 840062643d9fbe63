//! Status handler operations that return display wrapper types.

use super::Pipeline;
use crate::{
    display::{CreateResult, DeleteResult, Statuses, UpdateResult},
    error::Result,
    models::{SingletonRole, StatusDefinition},
    params::{CreateStatus, DeleteStatus, StatusRef, UpdateStatus},
};

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Human-readable list of what differs between two versions of a status.
fn status_changes(previous: &StatusDefinition, updated: &StatusDefinition) -> Vec<String> {
    let mut changes = Vec::new();
    if previous.name != updated.name {
        changes.push(format!("Name: '{}' → '{}'", previous.name, updated.name));
    }
    for role in SingletonRole::ALL {
        let (before, after) = (previous.has_role(role), updated.has_role(role));
        if before != after {
            changes.push(format!("{role}: {} → {}", yes_no(before), yes_no(after)));
        }
    }
    if previous.fields != updated.fields {
        changes.push(format!(
            "Fields: {} → {} defined",
            previous.fields.len(),
            updated.fields.len()
        ));
    }
    changes
}

impl Pipeline {
    /// Handle listing the catalog.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use leadflow_core::PipelineBuilder;
    /// # async {
    /// let pipeline = PipelineBuilder::new().build().await?;
    /// let statuses = pipeline.list_statuses_result().await?;
    /// println!("{statuses}");
    /// # Result::<(), leadflow_core::WorkflowError>::Ok(())
    /// # };
    /// ```
    pub async fn list_statuses_result(&self) -> Result<Statuses> {
        Ok(Statuses(self.list_statuses().await?))
    }

    /// Handle showing a single status.
    pub async fn show_status(&self, params: &StatusRef) -> Result<Option<StatusDefinition>> {
        self.get_status(params).await
    }

    /// Handle creating a status.
    pub async fn create_status_result(
        &self,
        params: &CreateStatus,
    ) -> Result<CreateResult<StatusDefinition>> {
        Ok(CreateResult::new(self.create_status(params).await?))
    }

    /// Handle updating a status, listing what changed.
    pub async fn update_status_result(
        &self,
        params: &UpdateStatus,
    ) -> Result<UpdateResult<StatusDefinition>> {
        let (previous, updated) = self.update_status_with_previous(params).await?;
        let changes = status_changes(&previous, &updated);
        Ok(UpdateResult::with_changes(updated, changes))
    }

    /// Handle deleting a status with confirmation.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` if `confirmed` is false.
    pub async fn delete_status_result(
        &self,
        params: &DeleteStatus,
    ) -> Result<DeleteResult<StatusDefinition>> {
        Ok(DeleteResult::new(self.delete_status(params).await?))
    }
}
