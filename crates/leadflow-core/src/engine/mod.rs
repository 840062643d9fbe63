//! Runtime side of the workflow: applying transitions and the other
//! lead-affecting operations.
//!
//! Everything here is synchronous and pure. Functions take a lead and a
//! catalog snapshot and hand back the changed lead plus the records to
//! persist; storage and notification are left to the caller (see
//! [`crate::db`] and [`crate::pipeline`]).
//!
//! ```rust
//! use jiff::Timestamp;
//! use leadflow_core::{
//!     catalog::StatusCatalog,
//!     engine::{create_lead_at, TransitionEngine},
//!     params::{CreateStatus, NewLead},
//! };
//! use serde_json::json;
//!
//! let mut catalog = StatusCatalog::new();
//! let contacted = catalog
//!     .create_status(CreateStatus { name: "Contacted".into(), ..Default::default() })
//!     .unwrap();
//!
//! let now = Timestamp::from_second(1_700_000_000).unwrap();
//! let mut data = leadflow_core::models::FieldData::new();
//! data.insert("First Name".into(), json!("Ann"));
//! let created = create_lead_at(
//!     NewLead { owner_id: "u1".into(), data, ..Default::default() },
//!     "u1",
//!     now,
//! )
//! .unwrap();
//!
//! let mut remark = leadflow_core::models::FieldData::new();
//! remark.insert("Remark".into(), json!("called"));
//! let outcome = TransitionEngine::new(&catalog)
//!     .transition_at(&created.lead, &contacted, remark, "u1", now)
//!     .unwrap();
//!
//! assert_eq!(outcome.lead.current_status_id.as_ref(), Some(&contacted.id));
//! assert_eq!(outcome.lead.custom_data["First Name"], "Ann");
//! assert_eq!(outcome.lead.custom_data["Remark"], "called");
//! ```

mod lifecycle;
mod transition;
pub mod validate;


pub use lifecycle::{
    create_lead, create_lead_at, snapshot, transfer_lead, transfer_lead_at, update_lead,
    update_lead_at, LeadChange, SNAPSHOT_STATUS_KEY,
};
pub use transition::{TransitionEngine, TransitionOutcome};
pub use validate::{allowed_values, effective_fields, validate_fields};
