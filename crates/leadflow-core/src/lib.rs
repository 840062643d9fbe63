//! Core library for the leadflow lead status workflow and audit engine.
//!
//! This crate owns the configurable status catalog, the transition engine
//! that validates and applies status changes to leads, the append-only
//! activity log, and the read-side formatter that turns log entries into
//! display summaries.
//!
//! # Layers
//!
//! - **Pure core**: [`catalog`], [`engine`] and [`audit`] operate on plain
//!   values and never touch storage or the clock unless asked to
//!   (`*_at` variants take an explicit timestamp).
//! - **Store**: [`db`] commits what the core returns inside SQLite
//!   transactions.
//! - **Service**: [`pipeline`] runs store operations on the blocking pool
//!   and broadcasts [`events`] after each commit.
//! - **Display**: [`display`] renders models and results as markdown for
//!   the terminal renderer and MCP responses.
//!
//! # Quick Start
//!
//! ```rust
//! use leadflow_core::{
//!     catalog::StatusCatalog,
//!     engine::{create_lead, TransitionEngine},
//!     params::{CreateStatus, NewLead},
//!     audit::ActivityFormatter,
//! };
//!
//! let mut catalog = StatusCatalog::new();
//! let contacted = catalog
//!     .create_status(CreateStatus { name: "Contacted".into(), ..Default::default() })
//!     .unwrap();
//!
//! let created = create_lead(NewLead { owner_id: "u1".into(), ..Default::default() }, "u1").unwrap();
//! let outcome = TransitionEngine::new(&catalog)
//!     .transition(&created.lead, &contacted, Default::default(), "u1")
//!     .unwrap();
//!
//! let summary = ActivityFormatter::new(&catalog).describe(&outcome.activity);
//! assert_eq!(summary.text, "Status set to Contacted");
//! ```

pub mod audit;
pub mod catalog;
pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod params;
pub mod pipeline;
pub mod projections;

// Re-export commonly used types
pub use audit::{ActivityFormatter, AuditLog};
pub use catalog::StatusCatalog;
pub use db::Database;
pub use display::{
    ActivityFeed, CreateResult, DeleteResult, LeadView, Leads, LocalDateTime, OperationStatus,
    Statuses, UpdateResult,
};
pub use engine::{TransitionEngine, TransitionOutcome};
pub use error::{Result, WorkflowError};
pub use events::{CatalogEvent, LeadStatusChanged, PipelineEvent};
pub use models::{
    Activity, ActivityAction, ActivityEntry, FieldData, FieldSchema, FieldType, Lead,
    StatusDefinition, StatusId,
};
pub use params::{
    CreateLead, CreateStatus, DeleteStatus, LeadRef, ListLeads, StatusRef, TransferLead,
    TransitionLead, UpdateLead, UpdateStatus,
};
pub use pipeline::{Pipeline, PipelineBuilder};
