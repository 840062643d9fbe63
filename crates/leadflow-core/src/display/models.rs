//! Display implementations for domain models and the formatter's output.
//!
//! Everything renders as markdown for the terminal renderer and MCP text
//! responses.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    audit::{display_value, ActivitySummary, DetailView, NO_STATUS},
    catalog::StatusCatalog,
    models::{FieldSchema, Lead, StatusDefinition, StatusId},
};

impl fmt::Display for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}** ({}", self.name, self.field_type)?;
        if self.required {
            write!(f, ", required")?;
        }
        write!(f, ")")?;
        if !self.options.is_empty() {
            let options: Vec<String> = self
                .options
                .iter()
                .map(|o| match &o.status_reference {
                    Some(id) => format!("{} → status {id}", o.value),
                    None => o.value.clone(),
                })
                .collect();
            write!(f, ": {}", options.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for StatusDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;

        let roles: Vec<&str> = self.roles().map(|r| r.as_str()).collect();
        if !roles.is_empty() {
            writeln!(f, "- **Roles**: {}", roles.join(", "))?;
        }
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;

        if self.fields.is_empty() {
            writeln!(f, "- **Fields**: none")?;
        } else {
            writeln!(f, "- **Fields**:")?;
            for field in &self.fields {
                writeln!(f, "  - {field}")?;
            }
        }
        writeln!(f)
    }
}

/// A lead together with the catalog its status ids resolve against.
pub struct LeadView {
    pub lead: Lead,
    pub catalog: StatusCatalog,
}

impl LeadView {
    pub fn new(lead: Lead, catalog: StatusCatalog) -> Self {
        Self { lead, catalog }
    }

    fn status_label(&self, id: Option<&StatusId>) -> String {
        match id {
            Some(id) => self
                .catalog
                .name_of(id)
                .map_or_else(|| crate::audit::unknown_status(id), str::to_string),
            None => NO_STATUS.to_string(),
        }
    }

    /// Current status name, or a placeholder.
    pub fn status_name(&self) -> String {
        self.status_label(self.lead.current_status_id.as_ref())
    }
}

impl fmt::Display for LeadView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lead = &self.lead;
        writeln!(f, "# Lead {}", lead.id)?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", self.status_name())?;
        writeln!(f, "- **Owner**: {}", lead.owner_id)?;
        if !lead.watchers.is_empty() {
            writeln!(f, "- **Watchers**: {}", lead.watchers.join(", "))?;
        }
        if let Some(project) = &lead.project {
            writeln!(f, "- **Project**: {} ({})", project.name, project.id)?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&lead.created_at))?;
        writeln!(f, "- **Updated**: {}", LocalDateTime(&lead.updated_at))?;

        if !lead.custom_data.is_empty() {
            writeln!(f, "\n## Data")?;
            writeln!(f)?;
            for (key, value) in &lead.custom_data {
                writeln!(f, "- **{key}**: {}", display_value(Some(value)))?;
            }
        }

        if lead.status_history.is_empty() {
            writeln!(f, "\nNo status history.")?;
        } else {
            writeln!(f, "\n## Status History")?;
            writeln!(f)?;
            for (index, entry) in lead.status_history.iter().enumerate() {
                writeln!(
                    f,
                    "{}. {} at {}",
                    index + 1,
                    self.status_label(Some(&entry.status_id)),
                    LocalDateTime(&entry.changed_at)
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailView::Snapshot(rows) | DetailView::Transfer(rows) => {
                for row in rows {
                    writeln!(f, "- **{}**: {}", row.label, row.value)?;
                }
                Ok(())
            }
            DetailView::StatusChange { from, to } => {
                writeln!(f, "- **From**: {from}")?;
                writeln!(f, "- **To**: {to}")
            }
            DetailView::Diff(rows) => {
                writeln!(f, "| Field | Before | After |")?;
                writeln!(f, "|:-|:-|:-|")?;
                for row in rows {
                    let marker = if row.changed() { " *" } else { "" };
                    writeln!(f, "| {}{marker} | {} | {} |", row.label, row.old, row.new)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ActivitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.icon.glyph(), self.text)?;
        writeln!(f)?;
        write!(f, "{}", self.detail_view)
    }
}
