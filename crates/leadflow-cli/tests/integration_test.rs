//! Integration tests comparing CLI output with the core Display types
//!
//! The CLI and the MCP server both print the core display wrappers, so
//! what the binary prints for a database must match what the pipeline
//! renders for the same database.

use std::{path::Path, process::Command};

use leadflow_core::{
    params::{LeadRef, ListLeads, StatusRef},
    Pipeline, PipelineBuilder,
};
use tempfile::TempDir;

/// Opens a pipeline over an existing database file
async fn open_pipeline(db_path: &Path) -> Pipeline {
    PipelineBuilder::new()
        .with_database_path(Some(db_path))
        .build()
        .await
        .expect("Failed to create pipeline")
}

/// Run a CLI command and capture its output
fn run_cli_command(db_path: &str, args: &[&str]) -> String {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_leadflow"));
    cmd.arg("--no-color").arg("--database-file").arg(db_path);

    for arg in args {
        cmd.arg(arg);
    }

    let output = cmd.output().expect("Failed to run CLI command");
    assert!(
        output.status.success(),
        "CLI command {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

fn extract_id(output: &str) -> String {
    output
        .lines()
        .find_map(|line| line.split("with ID: ").nth(1))
        .map(|id| id.trim().to_string())
        .expect("No ID in output")
}

/// Status listing printed by the CLI matches the Statuses display
#[tokio::test]
async fn test_status_list_display_consistency() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test.db");
    let db_str = db_path.to_str().unwrap();

    run_cli_command(db_str, &["status", "create", "New", "--default"]);
    run_cli_command(
        db_str,
        &[
            "status",
            "create",
            "Site Visit",
            "--field",
            "Visit Date:date!",
            "--site-visit-done",
        ],
    );
    run_cli_command(db_str, &["status", "create", "Booked", "--final"]);
    let cli_output = run_cli_command(db_str, &["status", "list"]);

    let pipeline = open_pipeline(&db_path).await;
    let statuses = pipeline
        .list_statuses_result()
        .await
        .expect("Failed to list statuses");
    let direct_output = format!("# Statuses\n\n{statuses}");

    assert_eq!(cli_output, direct_output);
    assert!(cli_output.contains("Booking Date"));
}

/// A single status renders the same through `status show`
#[tokio::test]
async fn test_status_show_display_consistency() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test.db");
    let db_str = db_path.to_str().unwrap();

    let created = run_cli_command(
        db_str,
        &[
            "status",
            "create",
            "Follow Up",
            "--field",
            "Next:select!=Later|Call",
        ],
    );
    let status_id = extract_id(&created);
    let cli_output = run_cli_command(db_str, &["status", "show", &status_id]);

    let pipeline = open_pipeline(&db_path).await;
    let status = pipeline
        .show_status(&StatusRef { id: status_id })
        .await
        .expect("Failed to get status")
        .expect("Status should exist");

    assert_eq!(cli_output, status.to_string());
    assert!(created.ends_with(&cli_output));
}

/// Lead detail and activity feed match the LeadView and ActivityFeed displays
#[tokio::test]
async fn test_lead_display_consistency() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test.db");
    let db_str = db_path.to_str().unwrap();

    let status_id = extract_id(&run_cli_command(
        db_str,
        &["status", "create", "Site Visit", "--field", "Visit Date:date!"],
    ));
    let lead_id = extract_id(&run_cli_command(
        db_str,
        &["lead", "create", "--owner", "u1", "--set", "Name=Ann"],
    ));
    run_cli_command(
        db_str,
        &[
            "lead",
            "move",
            &lead_id,
            &status_id,
            "--set",
            "Visit Date=2024-03-01",
        ],
    );

    let cli_show = run_cli_command(db_str, &["lead", "show", &lead_id]);
    let cli_activity = run_cli_command(db_str, &["lead", "activity", &lead_id]);
    let cli_list = run_cli_command(db_str, &["lead", "list"]);

    let pipeline = open_pipeline(&db_path).await;
    let params = LeadRef {
        id: lead_id.clone(),
    };
    let view = pipeline
        .show_lead(&params)
        .await
        .expect("Failed to get lead")
        .expect("Lead should exist");
    let feed = pipeline
        .lead_activity(&params)
        .await
        .expect("Failed to load activity");
    let leads = pipeline
        .list_leads_result(&ListLeads::default())
        .await
        .expect("Failed to list leads");

    assert_eq!(cli_show, view.to_string());
    assert_eq!(cli_activity, format!("# Activity for lead {lead_id}\n\n{feed}"));
    assert_eq!(cli_list, format!("# Leads\n\n{leads}"));
    assert!(cli_show.contains("## Status History"));
}

/// Empty databases render the same empty states
#[tokio::test]
async fn test_empty_display_consistency() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test.db");
    let db_str = db_path.to_str().unwrap();

    let cli_output = run_cli_command(db_str, &["lead", "list"]);

    let pipeline = open_pipeline(&db_path).await;
    let leads = pipeline
        .list_leads_result(&ListLeads::default())
        .await
        .expect("Failed to list leads");

    assert_eq!(cli_output, format!("# Leads\n\n{leads}"));
    assert_eq!(cli_output, "# Leads\n\nNo leads found.\n");
}
