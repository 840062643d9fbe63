//! Checks supplied field values against a target status's schema.

use jiff::{
    civil::{Date, DateTime, Time},
    Timestamp,
};
use serde_json::Value;

use crate::{
    catalog::{final_status_fields, StatusCatalog},
    error::{Result, WorkflowError},
    models::{FieldData, FieldSchema, FieldType, FieldViolation, StatusDefinition},
};

const PHONE_MIN_DIGITS: usize = 7;

/// Field list a transition into `target` is validated against. A final
/// status is always checked against the booking-date shape, whatever its
/// stored list says.
pub fn effective_fields(target: &StatusDefinition) -> Vec<FieldSchema> {
    if target.is_final {
        final_status_fields()
    } else {
        target.fields.clone()
    }
}

/// Null, a blank string and an empty array all count as "not supplied".
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Values a select/checkbox field accepts right now.
///
/// An option bound to a status accepts its own label and the referenced
/// status's current name. An option bound to a status that no longer exists
/// is not selectable.
pub fn allowed_values(field: &FieldSchema, catalog: &StatusCatalog) -> Vec<String> {
    let mut allowed = Vec::with_capacity(field.options.len());
    for option in &field.options {
        match &option.status_reference {
            None => allowed.push(option.value.clone()),
            Some(reference) => {
                if let Some(name) = catalog.name_of(reference) {
                    allowed.push(option.value.clone());
                    if name != option.value {
                        allowed.push(name.to_string());
                    }
                }
            }
        }
    }
    allowed
}

/// Validates `data` against the schema of `target`.
///
/// Fields are checked in schema order and the first violation is reported.
/// Keys that the schema does not mention pass through untouched.
pub fn validate_fields(
    target: &StatusDefinition,
    data: &FieldData,
    catalog: &StatusCatalog,
) -> Result<()> {
    for field in effective_fields(target) {
        let value = data.get(&field.name);
        if is_empty_value(value) {
            if field.required {
                return Err(WorkflowError::schema(&field.name, FieldViolation::Missing));
            }
            continue;
        }
        if let Some(value) = value {
            check_value(&field, value, catalog)
                .map_err(|violation| WorkflowError::schema(&field.name, violation))?;
        }
    }
    Ok(())
}

fn check_value(
    field: &FieldSchema,
    value: &Value,
    catalog: &StatusCatalog,
) -> std::result::Result<(), FieldViolation> {
    let invalid = || FieldViolation::InvalidType {
        expected: field.field_type,
    };

    match field.field_type {
        FieldType::Text | FieldType::Textarea => match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(()),
            _ => Err(invalid()),
        },
        FieldType::Number => match value {
            Value::Number(_) => Ok(()),
            Value::String(s) if s.trim().parse::<f64>().is_ok() => Ok(()),
            _ => Err(invalid()),
        },
        FieldType::Select => {
            let chosen = value.as_str().ok_or_else(invalid)?;
            check_option(field, chosen, catalog)
        }
        FieldType::Checkbox => match value {
            Value::String(chosen) => check_option(field, chosen, catalog),
            Value::Array(items) => {
                for item in items {
                    let chosen = item.as_str().ok_or_else(invalid)?;
                    check_option(field, chosen, catalog)?;
                }
                Ok(())
            }
            _ => Err(invalid()),
        },
        FieldType::Email => text_matches(value, is_email).ok_or_else(invalid),
        FieldType::Phone => text_matches(value, is_phone).ok_or_else(invalid),
        FieldType::Date => text_matches(value, is_date).ok_or_else(invalid),
        FieldType::Datetime => text_matches(value, is_datetime).ok_or_else(invalid),
        FieldType::Time => text_matches(value, is_time).ok_or_else(invalid),
    }
}

fn check_option(
    field: &FieldSchema,
    chosen: &str,
    catalog: &StatusCatalog,
) -> std::result::Result<(), FieldViolation> {
    if allowed_values(field, catalog).iter().any(|v| v == chosen) {
        Ok(())
    } else {
        Err(FieldViolation::NotAnOption {
            value: chosen.to_string(),
        })
    }
}

fn text_matches(value: &Value, check: fn(&str) -> bool) -> Option<()> {
    value.as_str().map(str::trim).filter(|s| check(s)).map(|_| ())
}

fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn is_phone(s: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ');
    s.chars().all(allowed) && s.chars().filter(char::is_ascii_digit).count() >= PHONE_MIN_DIGITS
}

fn is_date(s: &str) -> bool {
    s.len() == 10 && s.parse::<Date>().is_ok()
}

fn is_datetime(s: &str) -> bool {
    s.parse::<Timestamp>().is_ok() || (s.contains('T') && s.parse::<DateTime>().is_ok())
}

fn is_time(s: &str) -> bool {
    (s.len() == 5 || s.len() == 8) && s.parse::<Time>().is_ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(is_empty_value(None));
        assert!(is_empty_value(Some(&Value::Null)));
        assert!(is_empty_value(Some(&json!("  "))));
        assert!(is_empty_value(Some(&json!([]))));
        assert!(!is_empty_value(Some(&json!(0))));
        assert!(!is_empty_value(Some(&json!(false))));
    }

    #[test]
    fn test_scalar_formats() {
        assert!(is_email("ann@example.com"));
        assert!(!is_email("ann@"));
        assert!(!is_email("ann example@x.io"));

        assert!(is_phone("+91 (22) 5555-0199"));
        assert!(!is_phone("12345"));
        assert!(!is_phone("555-CALL-NOW"));

        assert!(is_date("2024-03-01"));
        assert!(!is_date("01/03/2024"));
        assert!(!is_date("2024-02-30"));

        assert!(is_datetime("2024-03-01T10:30:00Z"));
        assert!(is_datetime("2024-03-01T10:30"));
        assert!(!is_datetime("tomorrow"));

        assert!(is_time("09:15"));
        assert!(is_time("09:15:30"));
        assert!(!is_time("9am"));
    }
}
