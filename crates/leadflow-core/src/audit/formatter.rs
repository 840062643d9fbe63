//! Turns activity entries into display-ready summaries.

use serde_json::Value;

use crate::{
    catalog::StatusCatalog,
    models::{Activity, ActivityAction, ActivityEntry, FieldData, ProjectRef, StatusId, TransferDetails},
};

/// Shown for any display field a snapshot does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown as the "from" side of a lead's first transition.
pub const NO_STATUS: &str = "No status";

/// Fields rendered for `created` and `updated` entries, in display order.
///
/// This list is deliberately narrow and non-exhaustive: snapshots are
/// free-form maps and may hold any other key. Keys match case- and
/// punctuation-insensitively, so `propertyType`, `property_type` and
/// `Property Type` all fill the "Property Type" row.
pub const DISPLAY_FIELDS: [&str; 11] = [
    "Name",
    "Email",
    "Phone",
    "Company",
    "Priority",
    "Property Type",
    "Configuration",
    "Funding Mode",
    "Gender",
    "Budget",
    "Status",
];

/// Icon of an entry, one per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityIcon {
    Created,
    StatusChanged,
    Transferred,
    Updated,
}

impl ActivityIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            ActivityIcon::Created => "✚",
            ActivityIcon::StatusChanged => "➤",
            ActivityIcon::Transferred => "⇄",
            ActivityIcon::Updated => "✎",
        }
    }
}

impl From<ActivityAction> for ActivityIcon {
    fn from(action: ActivityAction) -> Self {
        match action {
            ActivityAction::Created => ActivityIcon::Created,
            ActivityAction::StatusChanged => ActivityIcon::StatusChanged,
            ActivityAction::Transferred => ActivityIcon::Transferred,
            ActivityAction::Updated => ActivityIcon::Updated,
        }
    }
}

/// A labelled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

/// One row of the before/after table of an `updated` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub label: String,
    pub old: String,
    pub new: String,
}

impl DiffRow {
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// Action-specific body of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// Display fields present in the lead's initial data
    Snapshot(Vec<DetailRow>),
    /// Resolved status names
    StatusChange { from: String, to: String },
    /// Owner and project hand-over
    Transfer(Vec<DetailRow>),
    /// Fixed display fields, before and after
    Diff(Vec<DiffRow>),
}

/// Display-ready rendering of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    pub icon: ActivityIcon,
    pub text: String,
    pub detail_view: DetailView,
}

/// Placeholder for a status id that no longer resolves.
pub fn unknown_status(id: &StatusId) -> String {
    format!("Unknown status ({id})")
}

fn normalize(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Value of the display field `label` in `data`, if present.
fn lookup<'d>(data: &'d FieldData, label: &str) -> Option<&'d Value> {
    let wanted = normalize(label);
    data.iter()
        .find(|(key, _)| normalize(key) == wanted)
        .map(|(_, value)| value)
}

/// Renders a field value for display; absent or empty values become "N/A".
pub fn display_value(value: Option<&Value>) -> String {
    let rendered = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| display_value(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(object @ Value::Object(_)) => object.to_string(),
    };
    if rendered.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        rendered
    }
}

fn project_label(project: Option<&ProjectRef>) -> String {
    project.map_or_else(|| NOT_AVAILABLE.to_string(), |p| p.name.clone())
}

fn optional_text(text: Option<&String>) -> String {
    display_value(text.map(|t| Value::String(t.clone())).as_ref())
}

/// Stateless projector from activity entries to summaries.
///
/// [`ActivityFormatter::describe`] depends only on the entry and the catalog
/// snapshot the formatter was built with, so calling it twice yields the
/// same summary. Status ids are resolved at call time: renames show up in
/// old entries, and deleted statuses render as a placeholder.
#[derive(Debug, Clone, Copy)]
pub struct ActivityFormatter<'a> {
    catalog: &'a StatusCatalog,
}

impl<'a> ActivityFormatter<'a> {
    pub fn new(catalog: &'a StatusCatalog) -> Self {
        Self { catalog }
    }

    /// Current name of `id`, or the unknown-status placeholder.
    pub fn status_name(&self, id: &StatusId) -> String {
        self.catalog
            .name_of(id)
            .map_or_else(|| unknown_status(id), str::to_string)
    }

    pub fn describe(&self, entry: &ActivityEntry) -> ActivitySummary {
        let icon = ActivityIcon::from(entry.action());
        let (text, detail_view) = match &entry.activity {
            Activity::Created { initial_data } => self.created(initial_data),
            Activity::StatusChanged {
                old_status_id,
                new_status_id,
            } => self.status_changed(old_status_id.as_ref(), new_status_id),
            Activity::Transferred(details) => self.transferred(details),
            Activity::Updated { old_data, new_data } => self.updated(old_data, new_data),
        };
        ActivitySummary {
            icon,
            text,
            detail_view,
        }
    }

    fn created(&self, initial_data: &FieldData) -> (String, DetailView) {
        let rows = DISPLAY_FIELDS
            .iter()
            .filter_map(|label| {
                lookup(initial_data, label).map(|value| DetailRow {
                    label: label.to_string(),
                    value: display_value(Some(value)),
                })
            })
            .collect();
        ("Lead created".to_string(), DetailView::Snapshot(rows))
    }

    fn status_changed(&self, old: Option<&StatusId>, new: &StatusId) -> (String, DetailView) {
        let to = self.status_name(new);
        let (text, from) = match old {
            Some(old) => {
                let from = self.status_name(old);
                (format!("Status changed from {from} to {to}"), from)
            }
            None => (format!("Status set to {to}"), NO_STATUS.to_string()),
        };
        (text, DetailView::StatusChange { from, to })
    }

    fn transferred(&self, details: &TransferDetails) -> (String, DetailView) {
        let text = format!(
            "Lead transferred from {} to {}",
            details.from_user_id, details.to_user_id
        );
        let rows = vec![
            DetailRow {
                label: "From".to_string(),
                value: details.from_user_id.clone(),
            },
            DetailRow {
                label: "To".to_string(),
                value: details.to_user_id.clone(),
            },
            DetailRow {
                label: "Old Project".to_string(),
                value: project_label(details.old_project_ref.as_ref()),
            },
            DetailRow {
                label: "New Project".to_string(),
                value: project_label(details.new_project_ref.as_ref()),
            },
            DetailRow {
                label: "Reason".to_string(),
                value: optional_text(details.reason.as_ref()),
            },
            DetailRow {
                label: "Notes".to_string(),
                value: optional_text(details.notes.as_ref()),
            },
        ];
        (text, DetailView::Transfer(rows))
    }

    fn updated(&self, old_data: &FieldData, new_data: &FieldData) -> (String, DetailView) {
        let rows: Vec<DiffRow> = DISPLAY_FIELDS
            .iter()
            .map(|label| DiffRow {
                label: label.to_string(),
                old: display_value(lookup(old_data, label)),
                new: display_value(lookup(new_data, label)),
            })
            .collect();
        let changed = rows.iter().filter(|row| row.changed()).count();
        let text = match changed {
            0 => "Lead details updated".to_string(),
            1 => "Lead details updated (1 field changed)".to_string(),
            n => format!("Lead details updated ({n} fields changed)"),
        };
        (text, DetailView::Diff(rows))
    }
}
