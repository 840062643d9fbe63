//! Status definitions and their catalog-wide roles.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::FieldSchema;

/// Opaque, stable identifier of a status definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct StatusId(String);

impl StatusId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StatusId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StatusId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One of the three flags that at most one status per catalog may hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum SingletonRole {
    /// Terminal stage of the pipeline
    Final,
    /// Suggested first status for new leads
    Default,
    /// Stage recorded once a site visit has happened
    SiteVisitDone,
}

impl SingletonRole {
    pub const ALL: [SingletonRole; 3] = [
        SingletonRole::Final,
        SingletonRole::Default,
        SingletonRole::SiteVisitDone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SingletonRole::Final => "final",
            SingletonRole::Default => "default",
            SingletonRole::SiteVisitDone => "site visit done",
        }
    }
}

impl fmt::Display for SingletonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SingletonRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "final" => Ok(SingletonRole::Final),
            "default" => Ok(SingletonRole::Default),
            "sitevisitdone" | "sitevisit" => Ok(SingletonRole::SiteVisitDone),
            _ => Err(format!("Invalid status role: {s}")),
        }
    }
}

/// The catalog operation that tripped a singleton rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    Create,
    Update,
}

impl fmt::Display for CatalogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogAction::Create => f.write_str("create"),
            CatalogAction::Update => f.write_str("update"),
        }
    }
}

/// A named stage in the lead pipeline with its own data-entry schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusDefinition {
    /// Identifier assigned at creation, never changed
    pub id: StatusId,

    /// Display name, unique within the catalog (case-sensitive)
    pub name: String,

    /// Ordered data-entry schema
    #[serde(default)]
    pub fields: Vec<FieldSchema>,

    #[serde(default)]
    pub is_final: bool,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub is_site_visit_done: bool,

    /// Custom fields held before the status was made final, restored when
    /// the final flag is cleared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_fields: Option<Vec<FieldSchema>>,

    /// Timestamp when the status was created (UTC)
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub created_at: Timestamp,

    /// Timestamp when the status was last modified (UTC)
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub updated_at: Timestamp,
}

impl StatusDefinition {
    /// Whether this status currently holds `role`.
    pub fn has_role(&self, role: SingletonRole) -> bool {
        match role {
            SingletonRole::Final => self.is_final,
            SingletonRole::Default => self.is_default,
            SingletonRole::SiteVisitDone => self.is_site_visit_done,
        }
    }

    /// Roles held by this status, in canonical order.
    pub fn roles(&self) -> impl Iterator<Item = SingletonRole> + '_ {
        SingletonRole::ALL.into_iter().filter(|r| self.has_role(*r))
    }

    pub(crate) fn set_role(&mut self, role: SingletonRole, value: bool) {
        match role {
            SingletonRole::Final => self.is_final = value,
            SingletonRole::Default => self.is_default = value,
            SingletonRole::SiteVisitDone => self.is_site_visit_done = value,
        }
    }

    /// Looks up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}
