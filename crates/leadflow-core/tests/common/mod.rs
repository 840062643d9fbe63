#![allow(dead_code)]

use leadflow_core::{
    params::{CreateLead, CreateStatus, NewLead},
    Database, FieldData, Lead, Pipeline, PipelineBuilder, StatusDefinition,
};
use serde_json::Value;
use tempfile::{NamedTempFile, TempDir};

/// Helper function to create a test pipeline
pub async fn create_test_pipeline() -> (TempDir, Pipeline) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let pipeline = PipelineBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create pipeline");
    (temp_dir, pipeline)
}

/// Helper function to create a temporary database
pub fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

pub fn data(pairs: &[(&str, Value)]) -> FieldData {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

pub fn named(name: &str) -> CreateStatus {
    CreateStatus {
        name: name.to_string(),
        ..Default::default()
    }
}

/// Adds a status straight through the store.
pub fn add_status(db: &mut Database, params: CreateStatus) -> StatusDefinition {
    let (status, _) = db
        .modify_catalog(|catalog| catalog.create_status(params))
        .expect("Failed to create status");
    status
}

pub fn add_lead(db: &mut Database, owner_id: &str, initial: FieldData) -> Lead {
    db.create_lead(&CreateLead {
        lead: NewLead {
            owner_id: owner_id.to_string(),
            data: initial,
            ..Default::default()
        },
        actor_id: owner_id.to_string(),
    })
    .expect("Failed to create lead")
    .lead
}
