use indexmap::IndexMap;
use serde::Serialize;

use crate::definition::attribute::AttributeDescriptor;
use crate::schema::names::{ColumnName, IndexName, TableName};

/// Fully assembled per-table representation consumed by the synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    pub model_name: String,
    pub model_file_name: String,
    pub table_name: TableName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_comment: Option<String>,
    /// Attributes keyed by generated name, in source column order.
    pub attributes: IndexMap<String, AttributeDescriptor>,
    pub indexes: Vec<IndexDescriptor>,
}

/// An index that is not folded into an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDescriptor {
    pub name: IndexName,
    pub unique: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub fields: Vec<ColumnName>,
}

impl ModelDefinition {
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.get(name)
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.values().filter(|a| a.primary_key)
    }
}
