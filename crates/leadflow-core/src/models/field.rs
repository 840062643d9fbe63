//! Field schema definitions carried by each status.

use std::{collections::BTreeMap, fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StatusId;

/// Free-form, string-keyed field values (lead custom data, transition input,
/// activity snapshots).
pub type FieldData = BTreeMap<String, Value>;

/// Primitive type of a status field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Email,
    Phone,
    Date,
    Datetime,
    Time,
    Textarea,
    Select,
    Checkbox,
}

impl FieldType {
    /// All field types, in the order the authoring UI lists them.
    pub const ALL: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Date,
        FieldType::Datetime,
        FieldType::Time,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Checkbox,
    ];

    /// Convert to the wire/database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Time => "time",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// Whether values of this type are drawn from an option list.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Checkbox)
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("Invalid field type: {s}"))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One allowed value of a select/checkbox field.
///
/// A select option may be bound to another status of the same catalog; the
/// binding is by id so that renames never break it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    /// Label stored when this option is chosen
    pub value: String,

    /// Status this option stands for, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reference: Option<StatusId>,
}

impl FieldOption {
    /// A plain option with no status binding.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status_reference: None,
        }
    }

    /// An option that stands for another status.
    pub fn referencing(value: impl Into<String>, status: StatusId) -> Self {
        Self {
            value: value.into(),
            status_reference: Some(status),
        }
    }
}

impl From<&str> for FieldOption {
    fn from(value: &str) -> Self {
        FieldOption::new(value)
    }
}

/// Describes one data field of a status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Field name, unique within the owning status
    pub name: String,

    /// Primitive value type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether a non-empty value must be supplied on transition
    #[serde(default)]
    pub required: bool,

    /// Allowed values; only populated for select/checkbox fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FieldSchema {
    /// Creates an optional field with no options.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            options: Vec::new(),
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Replaces the option list.
    pub fn with_options<I, O>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<FieldOption>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the invariants that hold for a field on its own, independent of
    /// the catalog. Returns the reason on failure.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("field name must not be empty".to_string());
        }
        if !self.field_type.has_options() && !self.options.is_empty() {
            return Err(format!(
                "options are only allowed on select and checkbox fields, not {}",
                self.field_type
            ));
        }
        if self.field_type.has_options() && self.options.is_empty() {
            return Err(format!("{} fields need at least one option", self.field_type));
        }
        let mut seen = Vec::with_capacity(self.options.len());
        for option in &self.options {
            if option.value.trim().is_empty() {
                return Err("option values must not be empty".to_string());
            }
            if seen.contains(&option.value.as_str()) {
                return Err(format!("option '{}' is listed twice", option.value));
            }
            seen.push(option.value.as_str());
        }
        Ok(())
    }
}

/// Why a supplied value was rejected by a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldViolation {
    /// Required field absent or empty
    Missing,
    /// Select/checkbox value outside the allowed set
    NotAnOption { value: String },
    /// Value does not parse as the field's type
    InvalidType { expected: FieldType },
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldViolation::Missing => write!(f, "is required"),
            FieldViolation::NotAnOption { value } => {
                write!(f, "has value '{value}' which is not one of the allowed options")
            }
            FieldViolation::InvalidType { expected } => {
                write!(f, "must be a valid {expected}")
            }
        }
    }
}
