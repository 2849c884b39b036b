#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::raw_default::RawDefault;

/// One column as reported by schema introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Raw type string, e.g. `INT(11) UNSIGNED` or `character varying(255)`.
    pub r#type: String,
    #[serde(default = "default_allow_null")]
    pub allow_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<RawDefault>,
    #[serde(default)]
    pub primary_key: bool,
    /// Only some dialects report this; `None` means "not reported".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_increment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_allow_null() -> bool {
    true
}

impl ColumnDescriptor {
    pub fn new(r#type: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            allow_null: true,
            default_value: None,
            primary_key: false,
            auto_increment: None,
            comment: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<RawDefault>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = Some(auto_increment);
        self
    }

    /// Lowercased raw type, the form every type pattern matches against.
    pub fn type_lower(&self) -> String {
        self.r#type.to_lowercase()
    }
}
