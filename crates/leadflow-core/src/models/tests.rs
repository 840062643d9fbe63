use jiff::Timestamp;
use serde_json::json;

use super::*;

fn ts(second: i64) -> Timestamp {
    Timestamp::from_second(second).unwrap()
}

fn sample_status() -> StatusDefinition {
    StatusDefinition {
        id: StatusId::from("st-qualified"),
        name: "Qualified".to_string(),
        fields: vec![
            FieldSchema::new("Budget", FieldType::Text).required(),
            FieldSchema::new("Source", FieldType::Select).with_options(["Web", "Referral"]),
        ],
        is_final: false,
        is_default: true,
        is_site_visit_done: false,
        prior_fields: None,
        created_at: ts(1_640_995_200),
        updated_at: ts(1_640_995_200),
    }
}

#[test]
fn test_field_type_parsing() {
    assert_eq!("select".parse::<FieldType>(), Ok(FieldType::Select));
    assert_eq!("DateTime".parse::<FieldType>(), Ok(FieldType::Datetime));
    assert!("blob".parse::<FieldType>().is_err());
    assert!(FieldType::Checkbox.has_options());
    assert!(!FieldType::Textarea.has_options());
}

#[test]
fn test_field_shape_rejects_options_on_text() {
    let field = FieldSchema::new("Remark", FieldType::Text).with_options(["a"]);
    let reason = field.check_shape().unwrap_err();
    assert!(reason.contains("only allowed on select and checkbox"));
}

#[test]
fn test_field_shape_requires_options_on_select() {
    let field = FieldSchema::new("Source", FieldType::Select);
    assert!(field.check_shape().is_err());

    let field = field.with_options(["Web", "Web"]);
    assert!(field.check_shape().unwrap_err().contains("listed twice"));
}

#[test]
fn test_field_shape_accepts_status_reference_options() {
    let field = FieldSchema::new("Next", FieldType::Select).with_options([
        FieldOption::new("Later"),
        FieldOption::referencing("Site Visit", StatusId::from("st-visit")),
    ]);
    assert!(field.check_shape().is_ok());
}

#[test]
fn test_status_definition_serializes_camel_case() {
    let status = sample_status();
    let json = serde_json::to_value(&status).unwrap();

    assert_eq!(json["id"], "st-qualified");
    assert_eq!(json["isDefault"], true);
    assert_eq!(json["isFinal"], false);
    assert_eq!(json["isSiteVisitDone"], false);
    assert_eq!(json["fields"][0]["type"], "text");
    assert_eq!(json["fields"][0]["required"], true);
    assert_eq!(json["fields"][1]["options"][0]["value"], "Web");
    assert!(json.get("priorFields").is_none());
}

#[test]
fn test_status_roles() {
    let mut status = sample_status();
    assert_eq!(status.roles().collect::<Vec<_>>(), vec![SingletonRole::Default]);

    status.set_role(SingletonRole::SiteVisitDone, true);
    assert!(status.has_role(SingletonRole::SiteVisitDone));
    assert_eq!(status.roles().count(), 2);
}

#[test]
fn test_singleton_role_parsing() {
    assert_eq!("site-visit-done".parse::<SingletonRole>(), Ok(SingletonRole::SiteVisitDone));
    assert_eq!("FINAL".parse::<SingletonRole>(), Ok(SingletonRole::Final));
    assert!("terminal".parse::<SingletonRole>().is_err());
}

#[test]
fn test_activity_transfer_wire_shape() {
    let entry = ActivityEntry {
        id: "act-1".to_string(),
        lead_id: "lead-1".to_string(),
        activity: Activity::Transferred(TransferDetails {
            from_user_id: "u1".to_string(),
            to_user_id: "u2".to_string(),
            old_project_ref: None,
            new_project_ref: Some(ProjectRef::new("p9", "Lakeside")),
            reason: Some("Territory change".to_string()),
            notes: None,
        }),
        actor_id: "admin".to_string(),
        timestamp: ts(1_700_000_000),
    };

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["activity"]["action"], "transferred");
    assert_eq!(json["activity"]["details"]["toUserId"], "u2");
    assert_eq!(
        json["activity"]["details"]["newProjectRef"],
        json!({ "id": "p9", "name": "Lakeside" })
    );
    assert!(json["activity"]["details"].get("oldProjectRef").is_none());

    let back: ActivityEntry = serde_json::from_value(json).unwrap();
    assert_eq!(back, entry);
    assert_eq!(back.action(), ActivityAction::Transferred);
}

#[test]
fn test_lead_recipients_deduplicate_owner() {
    let lead = Lead {
        id: "lead-1".to_string(),
        owner_id: "u1".to_string(),
        watchers: vec!["u2".to_string(), "u1".to_string(), "u2".to_string()],
        project: None,
        current_status_id: None,
        custom_data: FieldData::new(),
        status_history: Vec::new(),
        created_at: ts(1_700_000_000),
        updated_at: ts(1_700_000_000),
    };
    assert_eq!(lead.recipients(), vec!["u1".to_string(), "u2".to_string()]);
}
