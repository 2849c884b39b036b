#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::names::{ColumnName, TableName};

/// One foreign-key reference as reported by schema introspection.
///
/// Some dialects also list non-FK key usage with no referenced table; those
/// entries carry `None` and are ignored by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_name: Option<String>,
    pub column_name: ColumnName,
    #[serde(default)]
    pub referenced_table_name: Option<TableName>,
    #[serde(default)]
    pub referenced_column_name: Option<ColumnName>,
}

impl ForeignKeyDescriptor {
    pub fn new(column: &str, ref_table: &str, ref_column: &str) -> Self {
        Self {
            constraint_name: None,
            column_name: column.to_string(),
            referenced_table_name: Some(ref_table.to_string()),
            referenced_column_name: Some(ref_column.to_string()),
        }
    }
}
