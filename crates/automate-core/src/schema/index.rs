#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::names::{ColumnName, IndexName};

/// One index as reported by schema introspection, primary key included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RawIndex {
    pub name: IndexName,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub unique: bool,
    /// Index method, e.g. `BTREE`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub fields: Vec<IndexField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct IndexField {
    pub attribute: ColumnName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl RawIndex {
    /// Member columns in index order.
    pub fn column_names(&self) -> Vec<ColumnName> {
        self.fields.iter().map(|f| f.attribute.clone()).collect()
    }
}

impl From<&str> for IndexField {
    fn from(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            order: None,
            length: None,
        }
    }
}
