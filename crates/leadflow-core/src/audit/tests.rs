use jiff::Timestamp;
use serde_json::{json, Value};

use super::*;
use crate::{
    catalog::StatusCatalog,
    error::WorkflowError,
    models::{Activity, ActivityAction, ActivityEntry, FieldData, ProjectRef, StatusId, TransferDetails},
    params::{CreateStatus, StatusPatch},
};

fn ts(second: i64) -> Timestamp {
    Timestamp::from_second(second).unwrap()
}

fn data(pairs: &[(&str, Value)]) -> FieldData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn entry(lead: &str, activity: Activity, at: i64) -> ActivityEntry {
    ActivityEntry::new(lead, activity, "u-actor", ts(at))
}

fn changed(old: Option<&StatusId>, new: &StatusId) -> Activity {
    Activity::StatusChanged {
        old_status_id: old.cloned(),
        new_status_id: new.clone(),
    }
}

fn catalog_with(names: &[&str]) -> (StatusCatalog, Vec<StatusId>) {
    let mut catalog = StatusCatalog::new();
    let ids = names
        .iter()
        .map(|name| {
            catalog
                .create_status(CreateStatus {
                    name: name.to_string(),
                    ..Default::default()
                })
                .unwrap()
                .id
        })
        .collect();
    (catalog, ids)
}

#[test]
fn test_log_appends_in_order() {
    let (_, ids) = catalog_with(&["New"]);
    let mut log = AuditLog::new("lead-1");
    log.append(entry("lead-1", Activity::Created { initial_data: FieldData::new() }, 100))
        .unwrap();
    log.append(entry("lead-1", changed(None, &ids[0]), 100)).unwrap();

    assert_eq!(log.len(), 2);
    assert_eq!(log.latest().map(|e| e.action()), Some(ActivityAction::StatusChanged));
    assert_eq!(log.status_changes().count(), 1);
    assert_eq!(log.of_action(ActivityAction::Created).count(), 1);
}

#[test]
fn test_log_rejects_foreign_and_older_entries() {
    let mut log = AuditLog::new("lead-1");
    log.append(entry("lead-1", Activity::Created { initial_data: FieldData::new() }, 200))
        .unwrap();

    let err = log
        .append(entry("lead-2", Activity::Created { initial_data: FieldData::new() }, 300))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidInput { .. }));

    let err = log
        .append(entry(
            "lead-1",
            Activity::Updated {
                old_data: FieldData::new(),
                new_data: FieldData::new(),
            },
            100,
        ))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::AuditOrder { .. }));
    assert_eq!(log.len(), 1);

    let rebuilt = AuditLog::from_entries("lead-1", log.entries().to_vec()).unwrap();
    assert_eq!(rebuilt, log);
}

#[test]
fn test_describe_resolves_names_at_display_time() {
    let (mut catalog, ids) = catalog_with(&["New", "Contacted"]);
    let moved = entry("lead-1", changed(Some(&ids[0]), &ids[1]), 100);

    let before = ActivityFormatter::new(&catalog).describe(&moved);
    assert_eq!(before.icon, ActivityIcon::StatusChanged);
    assert_eq!(before.text, "Status changed from New to Contacted");

    catalog
        .update_status(
            &ids[1],
            StatusPatch {
                name: Some("Reached".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    let after = ActivityFormatter::new(&catalog).describe(&moved);
    assert_eq!(after.text, "Status changed from New to Reached");
    assert_eq!(
        after.detail_view,
        DetailView::StatusChange {
            from: "New".to_string(),
            to: "Reached".to_string(),
        }
    );
}

#[test]
fn test_describe_orphaned_status_renders_placeholder() {
    let (mut catalog, ids) = catalog_with(&["New", "Lost"]);
    let moved = entry("lead-1", changed(Some(&ids[0]), &ids[1]), 100);
    catalog.delete_status(&ids[1]).unwrap();

    let summary = ActivityFormatter::new(&catalog).describe(&moved);
    let placeholder = unknown_status(&ids[1]);
    assert_eq!(summary.text, format!("Status changed from New to {placeholder}"));
    assert!(placeholder.starts_with("Unknown status"));
}

#[test]
fn test_first_transition_has_no_previous_status() {
    let (catalog, ids) = catalog_with(&["New"]);
    let summary = ActivityFormatter::new(&catalog).describe(&entry("lead-1", changed(None, &ids[0]), 1));

    assert_eq!(summary.text, "Status set to New");
    assert_eq!(
        summary.detail_view,
        DetailView::StatusChange {
            from: NO_STATUS.to_string(),
            to: "New".to_string(),
        }
    );
}

#[test]
fn test_describe_is_pure() {
    let (catalog, ids) = catalog_with(&["New"]);
    let formatter = ActivityFormatter::new(&catalog);
    let entries = [
        entry("lead-1", Activity::Created { initial_data: data(&[("name", json!("Ann"))]) }, 1),
        entry("lead-1", changed(None, &ids[0]), 2),
        entry(
            "lead-1",
            Activity::Updated {
                old_data: data(&[("budget", json!(1))]),
                new_data: data(&[("budget", json!(2))]),
            },
            3,
        ),
    ];
    for e in &entries {
        assert_eq!(formatter.describe(e), formatter.describe(e));
    }
}

#[test]
fn test_updated_diff_uses_fixed_fields_with_na() {
    let (catalog, _) = catalog_with(&[]);
    let update = entry(
        "lead-1",
        Activity::Updated {
            old_data: data(&[
                ("Name", json!("Ann")),
                ("propertyType", json!("Villa")),
                ("Status", json!("Contacted")),
                ("Internal Score", json!(7)),
            ]),
            new_data: data(&[
                ("Name", json!("Ann")),
                ("property_type", json!("Apartment")),
                ("budget", json!(12_500_000)),
                ("Status", json!("Contacted")),
                ("Internal Score", json!(9)),
            ]),
        },
        100,
    );

    let summary = ActivityFormatter::new(&catalog).describe(&update);
    assert_eq!(summary.icon, ActivityIcon::Updated);
    assert_eq!(summary.text, "Lead details updated (2 fields changed)");

    let DetailView::Diff(rows) = summary.detail_view else {
        panic!("expected a diff view");
    };
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, DISPLAY_FIELDS.to_vec());

    let row = |label: &str| rows.iter().find(|r| r.label == label).unwrap().clone();
    assert_eq!(row("Property Type").old, "Villa");
    assert_eq!(row("Property Type").new, "Apartment");
    assert_eq!(row("Budget").old, NOT_AVAILABLE);
    assert_eq!(row("Budget").new, "12500000");
    assert_eq!(row("Email").old, NOT_AVAILABLE);
    assert!(!row("Status").changed());
    assert!(rows.iter().all(|r| r.label != "Internal Score"));
}

#[test]
fn test_transfer_rows() {
    let (catalog, _) = catalog_with(&[]);
    let transfer = entry(
        "lead-1",
        Activity::Transferred(TransferDetails {
            from_user_id: "u1".to_string(),
            to_user_id: "u2".to_string(),
            old_project_ref: Some(ProjectRef::new("p1", "Riverside")),
            new_project_ref: None,
            reason: Some("Leave".to_string()),
            notes: None,
        }),
        100,
    );

    let summary = ActivityFormatter::new(&catalog).describe(&transfer);
    assert_eq!(summary.text, "Lead transferred from u1 to u2");
    let DetailView::Transfer(rows) = summary.detail_view else {
        panic!("expected a transfer view");
    };
    let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, vec!["u1", "u2", "Riverside", NOT_AVAILABLE, "Leave", NOT_AVAILABLE]);
}

#[test]
fn test_created_snapshot_lists_present_display_fields() {
    let (catalog, _) = catalog_with(&[]);
    let created = entry(
        "lead-1",
        Activity::Created {
            initial_data: data(&[
                ("email", json!("ann@example.com")),
                ("Name", json!("Ann")),
                ("Gender", json!("")),
                ("Tags", json!(["vip"])),
            ]),
        },
        100,
    );

    let summary = ActivityFormatter::new(&catalog).describe(&created);
    assert_eq!(summary.icon.glyph(), "✚");
    assert_eq!(
        summary.detail_view,
        DetailView::Snapshot(vec![
            DetailRow {
                label: "Name".to_string(),
                value: "Ann".to_string(),
            },
            DetailRow {
                label: "Email".to_string(),
                value: "ann@example.com".to_string(),
            },
            DetailRow {
                label: "Gender".to_string(),
                value: NOT_AVAILABLE.to_string(),
            },
        ])
    );
}

#[test]
fn test_display_value_rendering() {
    assert_eq!(display_value(Some(&json!(true))), "Yes");
    assert_eq!(display_value(Some(&json!(["Phone", "Email"]))), "Phone, Email");
    assert_eq!(display_value(Some(&Value::Null)), NOT_AVAILABLE);
    assert_eq!(display_value(None), NOT_AVAILABLE);
}
