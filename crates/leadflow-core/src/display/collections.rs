//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use super::datetime::LocalDateTime;
use crate::{
    audit::ActivityFormatter,
    catalog::StatusCatalog,
    models::{ActivityEntry, Lead, StatusDefinition},
    projections::{FollowUpBucket, FollowUpBuckets},
};

/// Newtype wrapper for displaying the status catalog in insertion order.
///
/// # Examples
///
/// ```rust
/// use leadflow_core::{catalog::StatusCatalog, display::Statuses, params::CreateStatus};
///
/// let mut catalog = StatusCatalog::new();
/// catalog
///     .create_status(CreateStatus { name: "Contacted".into(), ..Default::default() })
///     .unwrap();
///
/// let statuses = Statuses(catalog.list_statuses().to_vec());
/// assert!(statuses.to_string().contains("## Contacted"));
/// ```
pub struct Statuses(pub Vec<StatusDefinition>);

impl Statuses {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&StatusDefinition> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatusDefinition> {
        self.0.iter()
    }
}

impl Index<usize> for Statuses {
    type Output = StatusDefinition;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Statuses {
    type Item = StatusDefinition;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Statuses {
    type Item = &'a StatusDefinition;
    type IntoIter = std::slice::Iter<'a, StatusDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Statuses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No statuses defined.")
        } else {
            for status in &self.0 {
                write!(f, "{status}")?;
            }
            Ok(())
        }
    }
}

/// Leads listed with their current status names.
pub struct Leads {
    pub leads: Vec<Lead>,
    pub catalog: StatusCatalog,
}

impl Leads {
    pub fn new(leads: Vec<Lead>, catalog: StatusCatalog) -> Self {
        Self { leads, catalog }
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lead> {
        self.leads.iter()
    }
}

impl fmt::Display for Leads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leads.is_empty() {
            return writeln!(f, "No leads found.");
        }
        for lead in &self.leads {
            let status = match &lead.current_status_id {
                Some(id) => self
                    .catalog
                    .name_of(id)
                    .map_or_else(|| crate::audit::unknown_status(id), str::to_string),
                None => crate::audit::NO_STATUS.to_string(),
            };
            writeln!(f, "## Lead {} ({status})", lead.id)?;
            writeln!(f)?;
            writeln!(f, "- **Owner**: {}", lead.owner_id)?;
            if let Some(project) = &lead.project {
                writeln!(f, "- **Project**: {}", project.name)?;
            }
            writeln!(f, "- **Updated**: {}", LocalDateTime(&lead.updated_at))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A lead's activity log rendered newest-first through the
/// [`ActivityFormatter`].
pub struct ActivityFeed {
    pub entries: Vec<ActivityEntry>,
    pub catalog: StatusCatalog,
}

impl ActivityFeed {
    pub fn new(entries: Vec<ActivityEntry>, catalog: StatusCatalog) -> Self {
        Self { entries, catalog }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for ActivityFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "No activity recorded.");
        }
        let formatter = ActivityFormatter::new(&self.catalog);
        for entry in self.entries.iter().rev() {
            let summary = formatter.describe(entry);
            writeln!(f, "### {} {}", summary.icon.glyph(), summary.text)?;
            writeln!(f)?;
            writeln!(
                f,
                "_{} by {}_",
                LocalDateTime(&entry.timestamp),
                entry.actor_id
            )?;
            writeln!(f)?;
            write!(f, "{}", summary.detail_view)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for FollowUpBuckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = self.reference_date {
            writeln!(f, "# Follow-ups as of {date}")?;
            writeln!(f)?;
        }
        if self.is_empty() {
            return writeln!(f, "No follow-ups scheduled.");
        }
        for bucket in FollowUpBucket::ALL {
            let items = self.get(bucket);
            if items.is_empty() {
                continue;
            }
            writeln!(f, "## {bucket} ({})", items.len())?;
            writeln!(f)?;
            for item in items {
                writeln!(
                    f,
                    "- {}: lead {} (owner {})",
                    item.due, item.lead.id, item.lead.owner_id
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
