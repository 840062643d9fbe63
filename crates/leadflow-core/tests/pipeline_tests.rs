mod common;

use common::{create_test_pipeline, data, named};
use leadflow_core::{
    params::{CreateLead, CreateStatus, FollowUps, LeadRef, NewLead, StatusPatch, UpdateLead},
    FieldData, FieldSchema, FieldType, PipelineEvent, TransitionLead, UpdateStatus, WorkflowError,
};
use serde_json::json;

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_lead_moves_through_pipeline_to_booking() {
    let (_temp_dir, pipeline) = create_test_pipeline().await;

    let new = pipeline
        .create_status(&CreateStatus {
            fields: vec![
                FieldSchema::new("Remark", FieldType::Text).required(),
                FieldSchema::new("Date", FieldType::Date).required(),
            ],
            is_default: true,
            ..named("New")
        })
        .await
        .expect("Failed to create default status");
    assert_eq!(new.fields.len(), 2);

    let booked = pipeline
        .create_status(&CreateStatus {
            is_final: true,
            ..named("Booked")
        })
        .await
        .expect("Failed to create final status");

    let lead = pipeline
        .create_lead(&CreateLead {
            lead: NewLead {
                owner_id: "agent-1".to_string(),
                data: data(&[("Name", json!("Ann")), ("Email", json!("ann@example.com"))]),
                ..Default::default()
            },
            actor_id: "agent-1".to_string(),
        })
        .await
        .expect("Failed to create lead");
    assert!(lead.current_status_id.is_none());

    let err = pipeline
        .transition_lead(&TransitionLead {
            lead_id: lead.id.clone(),
            status_id: new.id.to_string(),
            data: data(&[("Remark", json!("first call"))]),
            actor_id: "agent-1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::SchemaValidation { .. }));

    pipeline
        .transition_lead(&TransitionLead {
            lead_id: lead.id.clone(),
            status_id: new.id.to_string(),
            data: data(&[("Remark", json!("first call")), ("Date", json!("2024-03-01"))]),
            actor_id: "agent-1".to_string(),
        })
        .await
        .expect("Failed to enter default status");

    let err = pipeline
        .transition_lead(&TransitionLead {
            lead_id: lead.id.clone(),
            status_id: booked.id.to_string(),
            data: FieldData::new(),
            actor_id: "agent-1".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Field 'Booking Date' is required");

    let outcome = pipeline
        .transition_lead(&TransitionLead {
            lead_id: lead.id.clone(),
            status_id: booked.id.to_string(),
            data: data(&[("Booking Date", json!("2024-04-15"))]),
            actor_id: "agent-1".to_string(),
        })
        .await
        .expect("Failed to book lead");
    assert_eq!(outcome.old_status_id(), Some(&new.id));
    assert_eq!(outcome.lead.status_history.len(), 2);
    assert_eq!(outcome.lead.custom_data["Remark"], json!("first call"));
    assert_eq!(outcome.lead.custom_data["Booking Date"], json!("2024-04-15"));

    let feed = pipeline
        .lead_activity(&LeadRef { id: lead.id.clone() })
        .await
        .unwrap();
    assert_eq!(feed.len(), 3);
    let output = feed.to_string();
    assert!(output.contains("Status changed from New to Booked"));
    assert!(output.contains("Status set to New"));
    assert!(output.contains("Lead created"));
}

#[tokio::test]
async fn test_renamed_status_shows_new_name_in_old_entries() {
    let (_temp_dir, pipeline) = create_test_pipeline().await;
    let status = pipeline.create_status(&named("Visit")).await.unwrap();
    let lead = pipeline
        .create_lead(&CreateLead {
            lead: NewLead {
                owner_id: "u1".to_string(),
                ..Default::default()
            },
            actor_id: "u1".to_string(),
        })
        .await
        .unwrap();
    pipeline
        .transition_lead(&TransitionLead {
            lead_id: lead.id.clone(),
            status_id: status.id.to_string(),
            data: FieldData::new(),
            actor_id: "u1".to_string(),
        })
        .await
        .unwrap();

    pipeline
        .update_status(&UpdateStatus {
            id: status.id.to_string(),
            patch: StatusPatch {
                name: Some("Site Visit".to_string()),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    let output = pipeline
        .lead_activity(&LeadRef { id: lead.id })
        .await
        .unwrap()
        .to_string();
    assert!(output.contains("Status set to Site Visit"));
    assert!(!output.contains("Status set to Visit"));
}

#[tokio::test]
async fn test_concurrent_final_creates_admit_one() {
    let (_temp_dir, pipeline) = create_test_pipeline().await;

    let handles: Vec<_> = ["Booked", "Closed Won", "Sold"]
        .into_iter()
        .map(|name| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move {
                pipeline
                    .create_status(&CreateStatus {
                        is_final: true,
                        ..named(name)
                    })
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, WorkflowError::DuplicateSingletonRole { .. })),
        }
    }
    assert_eq!(created, 1);

    let catalog = pipeline.catalog().await.unwrap();
    assert_eq!(catalog.iter().filter(|s| s.is_final).count(), 1);
}

#[tokio::test]
async fn test_follow_ups_bucket_around_reference_date() {
    let (_temp_dir, pipeline) = create_test_pipeline().await;
    let mut ids = Vec::new();
    for due in ["2024-02-28", "2024-03-01", "2024-03-02", "2024-03-10"] {
        let lead = pipeline
            .create_lead(&CreateLead {
                lead: NewLead {
                    owner_id: "u1".to_string(),
                    ..Default::default()
                },
                actor_id: "u1".to_string(),
            })
            .await
            .unwrap();
        pipeline
            .update_lead(&UpdateLead {
                lead_id: lead.id.clone(),
                changes: data(&[("nextFollowUpAt", json!(due))]),
                actor_id: "u1".to_string(),
            })
            .await
            .unwrap();
        ids.push(lead.id);
    }

    let buckets = pipeline
        .follow_ups(&FollowUps {
            reference_date: Some("2024-03-01".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(buckets.len(), 4);
    assert_eq!(buckets.overdue[0].lead.id, ids[0]);
    assert_eq!(buckets.today[0].lead.id, ids[1]);
    assert_eq!(buckets.tomorrow[0].lead.id, ids[2]);
    assert_eq!(buckets.upcoming[0].lead.id, ids[3]);
}

#[tokio::test]
async fn test_events_only_follow_commits() {
    let (_temp_dir, pipeline) = create_test_pipeline().await;
    let mut events = pipeline.subscribe();

    let status = pipeline.create_status(&named("Contacted")).await.unwrap();
    assert!(pipeline.create_status(&named("Contacted")).await.is_err());

    match events.recv().await.unwrap() {
        PipelineEvent::Catalog { version, .. } => assert_eq!(version, 1),
        other => panic!("unexpected event {other:?}"),
    }
    assert!(events.try_recv().is_err());
    assert_eq!(pipeline.list_statuses().await.unwrap()[0].id, status.id);
}
