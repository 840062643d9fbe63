//! Per-lead, append-only activity log.

use crate::{
    error::{Result, WorkflowError},
    models::{ActivityAction, ActivityEntry},
};

/// Ordered activity entries of a single lead, oldest first.
///
/// Entries are only ever appended. An entry for another lead, or one stamped
/// earlier than the current last entry, is refused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLog {
    lead_id: String,
    entries: Vec<ActivityEntry>,
}

impl AuditLog {
    pub fn new(lead_id: impl Into<String>) -> Self {
        Self {
            lead_id: lead_id.into(),
            entries: Vec::new(),
        }
    }

    /// Rebuilds a log from stored entries, applying the same checks as
    /// [`AuditLog::append`].
    pub fn from_entries(
        lead_id: impl Into<String>,
        entries: impl IntoIterator<Item = ActivityEntry>,
    ) -> Result<Self> {
        let mut log = Self::new(lead_id);
        for entry in entries {
            log.append(entry)?;
        }
        Ok(log)
    }

    pub fn lead_id(&self) -> &str {
        &self.lead_id
    }

    /// Appends `entry` at the end of the log.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the entry belongs to another lead, `AuditOrder` if
    /// it is older than the last entry.
    pub fn append(&mut self, entry: ActivityEntry) -> Result<()> {
        if entry.lead_id != self.lead_id {
            return Err(WorkflowError::invalid_input("lead_id").with_reason(format!(
                "entry for lead {} cannot go into the log of lead {}",
                entry.lead_id, self.lead_id
            )));
        }
        if let Some(last) = self.entries.last() {
            if entry.timestamp < last.timestamp {
                return Err(WorkflowError::AuditOrder {
                    timestamp: entry.timestamp.to_string(),
                    last: last.timestamp.to_string(),
                });
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActivityEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one kind, oldest first.
    pub fn of_action(&self, action: ActivityAction) -> impl Iterator<Item = &ActivityEntry> + '_ {
        self.entries.iter().filter(move |e| e.action() == action)
    }

    pub fn status_changes(&self) -> impl Iterator<Item = &ActivityEntry> + '_ {
        self.of_action(ActivityAction::StatusChanged)
    }

    pub fn into_entries(self) -> Vec<ActivityEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a AuditLog {
    type Item = &'a ActivityEntry;
    type IntoIter = std::slice::Iter<'a, ActivityEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
