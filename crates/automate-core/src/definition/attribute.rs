use serde::Serialize;

use crate::definition::{data_type::CanonicalType, default_value::DefaultValue};
use crate::schema::names::ColumnName;

/// One generated model attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    /// Generated key, possibly case-folded.
    pub name: String,
    /// Original column name, used for persistence-layer mapping.
    pub field: ColumnName,
    pub r#type: CanonicalType,
    pub allow_null: bool,
    pub default_value: DefaultValue,
    pub primary_key: bool,
    pub auto_increment: bool,
    /// Name of the single-column unique index covering this attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<ForeignKeyRef>,
    pub comment: Option<String>,
}

/// Target of a foreign key: referenced column and the referenced model's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyRef {
    pub key: ColumnName,
    pub model: String,
}
