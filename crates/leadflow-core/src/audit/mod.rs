//! Audit trail: the per-lead activity log and its read-side formatter.

pub mod formatter;
mod activity_log;

#[cfg(test)]
mod tests;

pub use formatter::{
    display_value, unknown_status, ActivityFormatter, ActivityIcon, ActivitySummary, DetailRow,
    DetailView, DiffRow, DISPLAY_FIELDS, NOT_AVAILABLE, NO_STATUS,
};
pub use activity_log::AuditLog;
