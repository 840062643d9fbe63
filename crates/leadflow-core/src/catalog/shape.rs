//! Field-list transformations tied to the final flag.
//!
//! A final status records exactly one thing, the booking date. Turning the
//! flag on swaps the status's fields for that fixed shape and remembers the
//! custom list; turning it off brings the custom list back, or the two stock
//! fields when there is nothing to bring back.

use crate::models::{FieldSchema, FieldType, StatusDefinition};

/// Name of the only field a final status carries.
pub const BOOKING_DATE_FIELD: &str = "Booking Date";

/// The single required `date` field of a final status.
pub fn booking_date_field() -> FieldSchema {
    FieldSchema::new(BOOKING_DATE_FIELD, FieldType::Date).required()
}

/// Exact field list every final status carries.
pub fn final_status_fields() -> Vec<FieldSchema> {
    vec![booking_date_field()]
}

/// Stock fields for a non-final status with no custom list of its own.
pub fn default_custom_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new("Remark", FieldType::Text).required(),
        FieldSchema::new("Date", FieldType::Date).required(),
    ]
}

/// Whether `fields` is exactly the final-status shape.
pub fn has_final_shape(fields: &[FieldSchema]) -> bool {
    fields == final_status_fields().as_slice()
}

/// Marks the status final and replaces its fields with the final shape,
/// keeping the previous custom list in `prior_fields`. Applying it to a
/// status that is already final only reasserts the shape; the remembered
/// list stays untouched.
pub fn apply_final_status_shape(status: &mut StatusDefinition) {
    if status.is_final {
        status.fields = final_status_fields();
        return;
    }
    let previous = std::mem::replace(&mut status.fields, final_status_fields());
    if !previous.is_empty() {
        status.prior_fields = Some(previous);
    }
    status.is_final = true;
}

/// Clears the final flag and restores the custom fields remembered by
/// [`apply_final_status_shape`], falling back to [`default_custom_fields`].
pub fn restore_prior_field_shape(status: &mut StatusDefinition) {
    status.fields = status
        .prior_fields
        .take()
        .filter(|fields| !fields.is_empty())
        .unwrap_or_else(default_custom_fields);
    status.is_final = false;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::StatusId;

    fn status_with(fields: Vec<FieldSchema>) -> StatusDefinition {
        StatusDefinition {
            id: StatusId::from("st-1"),
            name: "Follow Up".to_string(),
            fields,
            is_final: false,
            is_default: false,
            is_site_visit_done: false,
            prior_fields: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_apply_then_restore_round_trips_custom_fields() {
        let custom = vec![
            FieldSchema::new("Remark", FieldType::Textarea),
            FieldSchema::new("Callback", FieldType::Datetime).required(),
        ];
        let mut status = status_with(custom.clone());

        apply_final_status_shape(&mut status);
        assert_eq!(status.fields, final_status_fields());
        assert_eq!(status.prior_fields.as_ref(), Some(&custom));

        restore_prior_field_shape(&mut status);
        assert_eq!(status.fields, custom);
        assert!(status.prior_fields.is_none());
    }

    #[test]
    fn test_restore_without_prior_uses_stock_fields() {
        let mut status = status_with(final_status_fields());
        restore_prior_field_shape(&mut status);

        assert_eq!(status.fields, default_custom_fields());
        assert_eq!(status.fields[0].name, "Remark");
        assert_eq!(status.fields[0].field_type, FieldType::Text);
        assert!(status.fields[0].required);
        assert_eq!(status.fields[1].name, "Date");
        assert_eq!(status.fields[1].field_type, FieldType::Date);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let custom = vec![FieldSchema::new("Remark", FieldType::Text)];
        let mut status = status_with(custom.clone());

        apply_final_status_shape(&mut status);
        apply_final_status_shape(&mut status);

        assert_eq!(status.prior_fields, Some(custom));
        assert!(has_final_shape(&status.fields));
    }

    #[test]
    fn test_custom_booking_date_list_survives_toggle() {
        let custom = final_status_fields();
        let mut status = status_with(custom.clone());

        apply_final_status_shape(&mut status);
        assert!(status.is_final);
        assert_eq!(status.prior_fields.as_ref(), Some(&custom));

        restore_prior_field_shape(&mut status);
        assert!(!status.is_final);
        assert_eq!(status.fields, custom);
    }

    #[test]
    fn test_reapplying_to_final_status_keeps_stock_fallback() {
        let mut status = status_with(final_status_fields());
        status.is_final = true;

        apply_final_status_shape(&mut status);
        assert!(status.prior_fields.is_none());

        restore_prior_field_shape(&mut status);
        assert_eq!(status.fields, default_custom_fields());
    }

    #[test]
    fn test_apply_on_empty_fields_remembers_nothing() {
        let mut status = status_with(Vec::new());
        apply_final_status_shape(&mut status);
        assert!(status.prior_fields.is_none());
    }
}
