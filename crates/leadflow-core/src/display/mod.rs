//! Display formatting: Display impls on models plus wrapper types for
//! collections and operation results.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │   Formatted     │
//! │ (Status, Lead,  │───▶│ (Statuses, ...  │───▶│    Output       │
//! │  ActivityEntry) │    │  CreateResult)  │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Every wrapper renders markdown. Anything that shows a status id resolves
//! it against a catalog at render time and falls back to an "unknown status"
//! placeholder when the status has been deleted.
//!
//! - [`collections`]: [`Statuses`], [`Leads`], [`ActivityFeed`] and the
//!   follow-up buckets
//! - [`results`]: [`CreateResult`], [`UpdateResult`], [`DeleteResult`]
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`]
//! - [`models`]: Display for models and [`LeadView`]

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{ActivityFeed, Leads, Statuses};
pub use datetime::LocalDateTime;
pub use models::LeadView;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
