//! Async service API over the catalog, the engine and the store.
//!
//! [`Pipeline`] is the caller-side coordinator: every operation opens the
//! database on a blocking task, lets the pure engine compute the change,
//! commits it, and only then announces it on a broadcast channel.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │    Database     │
//! │ (status_/lead_  │───▶│ (status_ops,    │───▶│   (via db/)     │
//! │   handlers)     │    │  lead_ops)      │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!   Display wrappers      Engine + commit        Transactions
//!                                │
//!                                ▼
//!                       broadcast::Sender<PipelineEvent>
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`Pipeline`] instances
//! - [`status_ops`] / [`status_handlers`]: catalog mutations and their display
//! - [`lead_ops`] / [`lead_handlers`]: lead lifecycle, activity and follow-ups
//!
//! # Usage
//!
//! ```rust,no_run
//! use leadflow_core::{
//!     params::{CreateLead, CreateStatus, NewLead, TransitionLead},
//!     PipelineBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = PipelineBuilder::new()
//!     .with_database_path(Some("/tmp/leadflow.db"))
//!     .build()
//!     .await?;
//! let mut events = pipeline.subscribe();
//!
//! let contacted = pipeline
//!     .create_status(&CreateStatus { name: "Contacted".into(), ..Default::default() })
//!     .await?;
//! let lead = pipeline
//!     .create_lead(&CreateLead {
//!         lead: NewLead { owner_id: "u1".into(), ..Default::default() },
//!         actor_id: "u1".into(),
//!     })
//!     .await?;
//! pipeline
//!     .transition_lead(&TransitionLead {
//!         lead_id: lead.id.clone(),
//!         status_id: contacted.id.to_string(),
//!         data: Default::default(),
//!         actor_id: "u1".into(),
//!     })
//!     .await?;
//!
//! let event = events.recv().await?;
//! println!("{event:?}");
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use log::debug;
use tokio::{sync::broadcast, task};

use crate::{
    db::Database,
    error::{Result, WorkflowError},
    events::PipelineEvent,
};

pub mod builder;
pub mod lead_handlers;
pub mod lead_ops;
pub mod status_handlers;
pub mod status_ops;


pub use builder::PipelineBuilder;

/// Main service interface for the status catalog and leads.
#[derive(Clone)]
pub struct Pipeline {
    pub(crate) db_path: PathBuf,
    events: broadcast::Sender<PipelineEvent>,
}

impl Pipeline {
    pub(crate) fn new(db_path: PathBuf, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self { db_path, events }
    }

    /// Path of the backing database file.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Receives every event published after this call. Slow receivers see
    /// `RecvError::Lagged` once the channel capacity is exceeded.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    pub(crate) fn publish(&self, event: PipelineEvent) {
        if self.events.send(event).is_err() {
            debug!("No subscribers for pipeline event");
        }
    }

    /// Runs `f` against a freshly opened database on the blocking pool.
    pub(crate) async fn with_database<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
