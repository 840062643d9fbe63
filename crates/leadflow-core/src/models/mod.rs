//! Data models for the lead status workflow.
//!
//! These are plain records: status definitions and their field schemas, the
//! lead slice the engine touches, and the audit entries it produces. Catalog
//! invariants live in [`crate::catalog`], transition rules in
//! [`crate::engine`], and Display implementations in [`crate::display`].
//!
//! # Wire format
//!
//! Every model serializes with camelCase keys (`isFinal`, `statusReference`,
//! `changedAt`, ...). Activity entries carry an adjacently tagged payload:
//!
//! ```rust
//! use jiff::Timestamp;
//! use leadflow_core::models::{Activity, ActivityEntry, StatusId};
//!
//! let entry = ActivityEntry::new(
//!     "lead-1",
//!     Activity::StatusChanged {
//!         old_status_id: None,
//!         new_status_id: StatusId::from("st-new"),
//!     },
//!     "user-7",
//!     Timestamp::from_second(1_700_000_000).unwrap(),
//! );
//! let json = serde_json::to_value(&entry).unwrap();
//! assert_eq!(json["activity"]["action"], "status_changed");
//! assert_eq!(json["activity"]["details"]["newStatusId"], "st-new");
//! ```

pub mod activity;
pub mod field;
pub mod lead;
pub mod status;

#[cfg(test)]
mod tests;

pub use activity::{Activity, ActivityAction, ActivityEntry, TransferDetails};
pub use field::{FieldData, FieldOption, FieldSchema, FieldType, FieldViolation};
pub use lead::{Lead, ProjectRef, StatusHistoryEntry};
pub use status::{CatalogAction, SingletonRole, StatusDefinition, StatusId};
