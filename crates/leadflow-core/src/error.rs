//! Error types for the status workflow engine and its store.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{CatalogAction, FieldViolation, SingletonRole, StatusId};

/// Comprehensive error type for all catalog, transition and store operations.
///
/// Every variant renders as a short operator-facing sentence; the UI shows
/// these verbatim so catalog editors can correct their input.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A create/update would give a second status the same singleton role
    #[error("Cannot {action} {role} status: a {role} status already exists: {holder_name}")]
    DuplicateSingletonRole {
        action: CatalogAction,
        role: SingletonRole,
        holder_id: StatusId,
        holder_name: String,
    },
    /// The referenced status does not exist in the catalog
    #[error("Status with ID {id} not found")]
    StatusNotFound { id: StatusId },
    /// Another status already uses this name
    #[error("A status named '{name}' already exists")]
    DuplicateStatusName { name: String },
    /// Supplied field data failed the target status's schema
    #[error("Field '{field}' {violation}")]
    SchemaValidation {
        field: String,
        violation: FieldViolation,
    },
    /// A status's field list is malformed
    #[error("Invalid field '{field}' on status '{status}': {reason}")]
    InvalidFieldSchema {
        status: String,
        field: String,
        reason: String,
    },
    /// A select/checkbox option points at a status that is not in the catalog
    #[error("Option '{option}' of field '{field}' references unknown status {status_id}")]
    UnknownStatusReference {
        field: String,
        option: String,
        status_id: StatusId,
    },
    /// Lead not found for the given ID
    #[error("Lead with ID {id} not found")]
    LeadNotFound { id: String },
    /// An activity entry would break the log's ordering
    #[error("Activity entry at {timestamp} precedes the last entry at {last}")]
    AuditOrder { timestamp: String, last: String },
    /// The catalog changed since it was read
    #[error("Catalog was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict { expected: u64, actual: u64 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WorkflowError {
        WorkflowError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WorkflowError {
        WorkflowError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WorkflowError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for a schema violation on `field`.
    pub fn schema(field: impl Into<String>, violation: FieldViolation) -> Self {
        Self::SchemaValidation {
            field: field.into(),
            violation,
        }
    }

    /// Returns true for errors caused by the caller's input rather than by
    /// storage or configuration.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSingletonRole { .. }
                | Self::StatusNotFound { .. }
                | Self::DuplicateStatusName { .. }
                | Self::SchemaValidation { .. }
                | Self::InvalidFieldSchema { .. }
                | Self::UnknownStatusReference { .. }
                | Self::LeadNotFound { .. }
                | Self::InvalidInput { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WorkflowError::database(message).with_source(e))
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;
