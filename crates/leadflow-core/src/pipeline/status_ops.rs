//! Status catalog operations for the Pipeline.
//!
//! Each mutation runs load, mutate and save in one immediate transaction and
//! publishes a [`CatalogEvent`] carrying the committed version.

use super::Pipeline;
use crate::{
    catalog::StatusCatalog,
    error::{Result, WorkflowError},
    events::{CatalogEvent, PipelineEvent},
    models::{StatusDefinition, StatusId},
    params::{CreateStatus, DeleteStatus, StatusRef, UpdateStatus},
};

impl Pipeline {
    /// Loads the whole catalog.
    pub async fn catalog(&self) -> Result<StatusCatalog> {
        self.with_database(|db| db.load_catalog()).await
    }

    /// Lists statuses in insertion order.
    pub async fn list_statuses(&self) -> Result<Vec<StatusDefinition>> {
        let catalog = self.catalog().await?;
        Ok(catalog.list_statuses().to_vec())
    }

    /// Retrieves a status by its ID.
    pub async fn get_status(&self, params: &StatusRef) -> Result<Option<StatusDefinition>> {
        let id = StatusId::from(params.id.as_str());
        let catalog = self.catalog().await?;
        Ok(catalog.get_status(&id).cloned())
    }

    /// Adds a status to the catalog.
    pub async fn create_status(&self, params: &CreateStatus) -> Result<StatusDefinition> {
        let params = params.clone();
        let (status, catalog) = self
            .with_database(move |db| db.modify_catalog(|catalog| catalog.create_status(params)))
            .await?;

        self.publish(PipelineEvent::Catalog {
            version: catalog.version(),
            event: CatalogEvent::Created {
                status: status.clone(),
            },
        });
        Ok(status)
    }

    /// Applies a partial update to a status.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the patch changes nothing.
    pub async fn update_status(&self, params: &UpdateStatus) -> Result<StatusDefinition> {
        let (_, updated) = self.update_status_with_previous(params).await?;
        Ok(updated)
    }

    /// Like [`Pipeline::update_status`], also returning the status as it was
    /// before the update.
    pub async fn update_status_with_previous(
        &self,
        params: &UpdateStatus,
    ) -> Result<(StatusDefinition, StatusDefinition)> {
        if params.patch.is_empty() {
            return Err(WorkflowError::invalid_input("patch")
                .with_reason("At least one of name, fields or a role flag must be provided"));
        }
        let id = StatusId::from(params.id.as_str());
        let patch = params.patch.clone();

        let ((previous, updated), catalog) = self
            .with_database(move |db| {
                db.modify_catalog(|catalog| {
                    let previous = catalog
                        .get_status(&id)
                        .cloned()
                        .ok_or_else(|| WorkflowError::StatusNotFound { id: id.clone() })?;
                    let updated = catalog.update_status(&id, patch)?;
                    Ok((previous, updated))
                })
            })
            .await?;

        self.publish(PipelineEvent::Catalog {
            version: catalog.version(),
            event: CatalogEvent::Updated {
                status: updated.clone(),
            },
        });
        Ok((previous, updated))
    }

    /// Removes a status from the catalog. Leads that reference it are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// `InvalidInput` unless `confirmed` is set; `StatusNotFound` if the
    /// status does not exist.
    pub async fn delete_status(&self, params: &DeleteStatus) -> Result<StatusDefinition> {
        if !params.confirmed {
            return Err(WorkflowError::invalid_input("confirmed").with_reason(
                "Status deletion requires explicit confirmation. Set 'confirmed' to true to proceed.",
            ));
        }
        let id = StatusId::from(params.id.as_str());

        let (deleted, catalog) = self
            .with_database(move |db| db.modify_catalog(|catalog| catalog.delete_status(&id)))
            .await?;

        self.publish(PipelineEvent::Catalog {
            version: catalog.version(),
            event: CatalogEvent::Deleted {
                id: deleted.id.clone(),
            },
        });
        Ok(deleted)
    }
}
