//! Catalog-wide checks run before any write is applied.

use super::{shape, StatusCatalog};
use crate::{
    error::{Result, WorkflowError},
    models::{CatalogAction, FieldSchema, SingletonRole, StatusDefinition, StatusId},
};

impl StatusCatalog {
    /// Status other than `exclude` that holds `role`.
    fn other_holder(
        &self,
        role: SingletonRole,
        exclude: Option<&StatusId>,
    ) -> Option<&StatusDefinition> {
        self.statuses
            .iter()
            .filter(|s| Some(&s.id) != exclude)
            .find(|s| s.has_role(role))
    }

    /// Fails with `DuplicateSingletonRole` if any role in `wanted` is already
    /// held by a status other than `exclude`.
    pub(super) fn check_singletons(
        &self,
        action: CatalogAction,
        wanted: &[SingletonRole],
        exclude: Option<&StatusId>,
    ) -> Result<()> {
        for role in wanted {
            if let Some(holder) = self.other_holder(*role, exclude) {
                return Err(WorkflowError::DuplicateSingletonRole {
                    action,
                    role: *role,
                    holder_id: holder.id.clone(),
                    holder_name: holder.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Name must be non-empty and unused by any status other than `exclude`.
    pub(super) fn check_name(&self, name: &str, exclude: Option<&StatusId>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(WorkflowError::invalid_input("name").with_reason("status name must not be empty"));
        }
        let taken = self
            .statuses
            .iter()
            .any(|s| Some(&s.id) != exclude && s.name == name);
        if taken {
            return Err(WorkflowError::DuplicateStatusName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Validates a field list for status `status_name`. Status references
    /// must resolve in the current catalog or point at `self_id`.
    pub(super) fn check_fields(
        &self,
        status_name: &str,
        fields: &[FieldSchema],
        self_id: Option<&StatusId>,
    ) -> Result<()> {
        let mut names: Vec<&str> = Vec::with_capacity(fields.len());
        for field in fields {
            field
                .check_shape()
                .map_err(|reason| WorkflowError::InvalidFieldSchema {
                    status: status_name.to_string(),
                    field: field.name.clone(),
                    reason,
                })?;
            if names.contains(&field.name.as_str()) {
                return Err(WorkflowError::InvalidFieldSchema {
                    status: status_name.to_string(),
                    field: field.name.clone(),
                    reason: "field names must be unique within a status".to_string(),
                });
            }
            names.push(&field.name);

            for option in &field.options {
                let Some(reference) = &option.status_reference else {
                    continue;
                };
                if Some(reference) != self_id && !self.contains(reference) {
                    return Err(WorkflowError::UnknownStatusReference {
                        field: field.name.clone(),
                        option: option.value.clone(),
                        status_id: reference.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Re-checks every catalog invariant from scratch. Used when a catalog is
    /// rebuilt from storage.
    pub fn verify(&self) -> Result<()> {
        for role in SingletonRole::ALL {
            let holders: Vec<&StatusDefinition> =
                self.statuses.iter().filter(|s| s.has_role(role)).collect();
            if let [first, second, ..] = holders.as_slice() {
                return Err(WorkflowError::DuplicateSingletonRole {
                    action: CatalogAction::Update,
                    role,
                    holder_id: first.id.clone(),
                    holder_name: format!("{} (also held by {})", first.name, second.name),
                });
            }
        }
        for (index, status) in self.statuses.iter().enumerate() {
            if status.name.trim().is_empty() {
                return Err(WorkflowError::invalid_input("name")
                    .with_reason(format!("status {} has an empty name", status.id)));
            }
            let duplicate = self.statuses[..index]
                .iter()
                .any(|other| other.id == status.id || other.name == status.name);
            if duplicate {
                return Err(WorkflowError::DuplicateStatusName {
                    name: status.name.clone(),
                });
            }
            if status.is_final && !shape::has_final_shape(&status.fields) {
                return Err(WorkflowError::InvalidFieldSchema {
                    status: status.name.clone(),
                    field: shape::BOOKING_DATE_FIELD.to_string(),
                    reason: "a final status must carry only the booking date field".to_string(),
                });
            }
        }
        Ok(())
    }
}
