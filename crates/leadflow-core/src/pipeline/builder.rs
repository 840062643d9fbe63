//! Builder for creating and configuring Pipeline instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::Pipeline;
use crate::{
    db::Database,
    error::{Result, WorkflowError},
};

/// Default capacity of the event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Builder for creating and configuring Pipeline instances.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    database_path: Option<PathBuf>,
    event_capacity: usize,
}

impl PipelineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG Base Directory specification:
    /// `$XDG_DATA_HOME/leadflow/leadflow.db` or
    /// `~/.local/share/leadflow/leadflow.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets how many unreceived events a subscriber may fall behind by.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Builds the configured pipeline, creating the database and its schema
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::FileSystem` if the database directory cannot
    /// be created.
    /// Returns `WorkflowError::Database` if database initialization fails.
    pub async fn build(self) -> Result<Pipeline> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkflowError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), WorkflowError>(())
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Pipeline::new(db_path, self.event_capacity))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("leadflow")
            .place_data_file("leadflow.db")
            .map_err(|e| WorkflowError::XdgDirectory(e.to_string()))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
