//! Status catalog authoring and invariant enforcement.
//!
//! A [`StatusCatalog`] is a plain, versioned value: callers load it, mutate
//! it through the methods here, and persist it. Every mutation validates
//! first and writes second, so a failed call leaves the catalog untouched.
//!
//! # Invariants
//!
//! After every successful mutation:
//!
//! 1. at most one status is final, at most one is default, and at most one
//!    is site-visit-done;
//! 2. names are non-empty and unique (case-sensitive);
//! 3. every final status carries exactly the `Booking Date` field.
//!
//! The singleton checks are only sound if nothing else writes the catalog
//! between the check and the commit. The version counter lets a store
//! reject a stale write (see [`StatusCatalog::check_version`]).
//!
//! # Example
//!
//! ```rust
//! use leadflow_core::{catalog::StatusCatalog, params::CreateStatus, WorkflowError};
//!
//! let mut catalog = StatusCatalog::new();
//! catalog
//!     .create_status(CreateStatus {
//!         name: "Booked".to_string(),
//!         is_final: true,
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let err = catalog
//!     .create_status(CreateStatus {
//!         name: "Closed Lost".to_string(),
//!         is_final: true,
//!         ..Default::default()
//!     })
//!     .unwrap_err();
//! assert!(matches!(err, WorkflowError::DuplicateSingletonRole { .. }));
//! assert_eq!(catalog.len(), 1);
//! ```

mod invariants;
pub mod shape;


use jiff::Timestamp;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorkflowError},
    models::{CatalogAction, SingletonRole, StatusDefinition, StatusId},
    params::{CreateStatus, StatusPatch},
};

pub use shape::{
    apply_final_status_shape, booking_date_field, default_custom_fields, final_status_fields,
    restore_prior_field_shape, BOOKING_DATE_FIELD,
};

/// The set of status definitions of one tenant, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusCatalog {
    version: u64,
    statuses: Vec<StatusDefinition>,
}

impl StatusCatalog {
    /// An empty catalog at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a catalog from stored parts, re-checking every invariant.
    pub fn from_parts(version: u64, statuses: Vec<StatusDefinition>) -> Result<Self> {
        let catalog = Self { version, statuses };
        catalog.verify()?;
        Ok(catalog)
    }

    /// Number of successful mutations applied since the catalog was created.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Compare-and-swap guard: fails unless the catalog is still at
    /// `expected`.
    pub fn check_version(&self, expected: u64) -> Result<()> {
        if self.version == expected {
            Ok(())
        } else {
            Err(WorkflowError::VersionConflict {
                expected,
                actual: self.version,
            })
        }
    }

    /// All statuses in insertion order.
    pub fn list_statuses(&self) -> &[StatusDefinition] {
        &self.statuses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatusDefinition> {
        self.statuses.iter()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn get_status(&self, id: &StatusId) -> Option<&StatusDefinition> {
        self.statuses.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &StatusId) -> bool {
        self.get_status(id).is_some()
    }

    /// Exact, case-sensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&StatusDefinition> {
        self.statuses.iter().find(|s| s.name == name)
    }

    /// Current name of a status, if it still exists.
    pub fn name_of(&self, id: &StatusId) -> Option<&str> {
        self.get_status(id).map(|s| s.name.as_str())
    }

    /// The status holding `role`, if any.
    pub fn holder_of(&self, role: SingletonRole) -> Option<&StatusDefinition> {
        self.statuses.iter().find(|s| s.has_role(role))
    }

    /// Suggested first status for new leads. The engine never applies it on
    /// its own.
    pub fn default_status(&self) -> Option<&StatusDefinition> {
        self.holder_of(SingletonRole::Default)
    }

    pub fn final_status(&self) -> Option<&StatusDefinition> {
        self.holder_of(SingletonRole::Final)
    }

    pub fn site_visit_status(&self) -> Option<&StatusDefinition> {
        self.holder_of(SingletonRole::SiteVisitDone)
    }

    fn position(&self, id: &StatusId) -> Result<usize> {
        self.statuses
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| WorkflowError::StatusNotFound { id: id.clone() })
    }

    /// Creates a status and returns it for the caller to publish.
    ///
    /// A final status always gets the fixed booking-date field list; any
    /// fields supplied with it are discarded.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty name, `DuplicateStatusName`,
    /// `DuplicateSingletonRole`, `InvalidFieldSchema` or
    /// `UnknownStatusReference`. Nothing is written on error.
    pub fn create_status(&mut self, params: CreateStatus) -> Result<StatusDefinition> {
        let name = params.name.trim().to_string();
        self.check_name(&name, None)?;

        let wanted: Vec<SingletonRole> = [
            (SingletonRole::Final, params.is_final),
            (SingletonRole::Default, params.is_default),
            (SingletonRole::SiteVisitDone, params.is_site_visit_done),
        ]
        .into_iter()
        .filter_map(|(role, on)| on.then_some(role))
        .collect();
        self.check_singletons(CatalogAction::Create, &wanted, None)?;

        let fields = if params.is_final {
            if !params.fields.is_empty() && !shape::has_final_shape(&params.fields) {
                debug!("Discarding {} custom fields on final status '{name}'", params.fields.len());
            }
            final_status_fields()
        } else {
            self.check_fields(&name, &params.fields, None)?;
            params.fields
        };

        let now = Timestamp::now();
        let status = StatusDefinition {
            id: StatusId::generate(),
            name,
            fields,
            is_final: params.is_final,
            is_default: params.is_default,
            is_site_visit_done: params.is_site_visit_done,
            prior_fields: None,
            created_at: now,
            updated_at: now,
        };

        self.statuses.push(status.clone());
        self.version += 1;
        debug!("Created status '{}' ({}) at catalog version {}", status.name, status.id, self.version);
        Ok(status)
    }

    /// Applies `patch` to the status `id` and returns the updated definition.
    ///
    /// Turning `is_final` on swaps the fields for the booking-date shape and
    /// remembers the custom list; turning it off restores that list (or the
    /// stock Remark/Date pair). Fields supplied in the same patch take
    /// precedence over the remembered list. Fields supplied for a status
    /// that stays final are ignored.
    ///
    /// # Errors
    ///
    /// `StatusNotFound` if `id` is absent, plus the same validation errors as
    /// [`StatusCatalog::create_status`]. The status being updated never
    /// conflicts with itself.
    pub fn update_status(&mut self, id: &StatusId, patch: StatusPatch) -> Result<StatusDefinition> {
        let index = self.position(id)?;
        let current = &self.statuses[index];

        let name = match &patch.name {
            Some(name) => {
                let name = name.trim().to_string();
                self.check_name(&name, Some(id))?;
                name
            }
            None => current.name.clone(),
        };

        let is_final = patch.is_final.unwrap_or(current.is_final);
        let is_default = patch.is_default.unwrap_or(current.is_default);
        let is_site_visit_done = patch.is_site_visit_done.unwrap_or(current.is_site_visit_done);

        let wanted: Vec<SingletonRole> = [
            (SingletonRole::Final, is_final),
            (SingletonRole::Default, is_default),
            (SingletonRole::SiteVisitDone, is_site_visit_done),
        ]
        .into_iter()
        .filter_map(|(role, on)| on.then_some(role))
        .collect();
        self.check_singletons(CatalogAction::Update, &wanted, Some(id))?;

        let was_final = current.is_final;
        let supplied = match patch.fields {
            Some(fields) if !(was_final && is_final) => {
                self.check_fields(&name, &fields, Some(id))?;
                Some(fields)
            }
            Some(_) => {
                debug!("Ignoring field changes on final status '{name}'");
                None
            }
            None => None,
        };

        let mut updated = current.clone();
        updated.name = name;
        updated.set_role(SingletonRole::Default, is_default);
        updated.set_role(SingletonRole::SiteVisitDone, is_site_visit_done);

        match (was_final, is_final) {
            (false, true) => {
                if let Some(fields) = supplied {
                    updated.fields = fields;
                }
                apply_final_status_shape(&mut updated);
            }
            (true, false) => match supplied {
                Some(fields) => {
                    updated.fields = fields;
                    updated.prior_fields = None;
                }
                None => restore_prior_field_shape(&mut updated),
            },
            (true, true) => apply_final_status_shape(&mut updated),
            (false, false) => {
                if let Some(fields) = supplied {
                    updated.fields = fields;
                }
            }
        }
        updated.set_role(SingletonRole::Final, is_final);
        updated.updated_at = Timestamp::now();

        self.statuses[index] = updated.clone();
        self.version += 1;
        debug!("Updated status '{}' ({}) at catalog version {}", updated.name, updated.id, self.version);
        Ok(updated)
    }

    /// Removes a status and returns it. Leads that reference it keep the
    /// orphaned id; options of other statuses that reference it are left
    /// as they are.
    ///
    /// # Errors
    ///
    /// `StatusNotFound` if `id` is absent.
    pub fn delete_status(&mut self, id: &StatusId) -> Result<StatusDefinition> {
        let index = self.position(id)?;
        let removed = self.statuses.remove(index);
        self.version += 1;
        debug!("Deleted status '{}' ({}) at catalog version {}", removed.name, removed.id, self.version);
        Ok(removed)
    }
}

impl<'a> IntoIterator for &'a StatusCatalog {
    type Item = &'a StatusDefinition;
    type IntoIter = std::slice::Iter<'a, StatusDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.statuses.iter()
    }
}
