//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use super::models::LeadView;
use crate::models::StatusDefinition;

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use leadflow_core::{catalog::StatusCatalog, display::CreateResult, params::CreateStatus};
///
/// let mut catalog = StatusCatalog::new();
/// let status = catalog
///     .create_status(CreateStatus { name: "Booked".into(), is_final: true, ..Default::default() })
///     .unwrap();
///
/// let output = CreateResult::new(status).to_string();
/// assert!(output.starts_with("Created status 'Booked'"));
/// assert!(output.contains("**Booking Date** (date, required)"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<StatusDefinition> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Created status '{}' with ID: {}",
            self.resource.name, self.resource.id
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<LeadView> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created lead with ID: {}", self.resource.lead.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of the changes made.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for UpdateResult<StatusDefinition> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated status '{}' with ID: {}",
            self.resource.name, self.resource.id
        )?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<LeadView> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated lead with ID: {}", self.resource.lead.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<StatusDefinition> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted status '{}' (ID: {})",
            self.resource.name, self.resource.id
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Leads already in this status keep it in their history; it now shows as an unknown status."
        )
    }
}
