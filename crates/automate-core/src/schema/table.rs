#[cfg(feature = "schema")]
use schemars::JsonSchema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{
    column::ColumnDescriptor, dialect::SqlDialect, foreign_key::ForeignKeyDescriptor,
    index::RawIndex, names::{ColumnName, TableName},
};

/// Everything introspection reports for one table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Columns in source order.
    #[serde(alias = "structures")]
    pub columns: IndexMap<ColumnName, ColumnDescriptor>,
    #[serde(default)]
    pub indexes: Vec<RawIndex>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

/// A whole introspection run: tables in discovery order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<SqlDialect>,
    pub tables: IndexMap<TableName, TableSchema>,
}

impl TableSchema {
    pub fn column(mut self, name: &str, column: ColumnDescriptor) -> Self {
        self.columns.insert(name.to_string(), column);
        self
    }

    pub fn index(mut self, index: RawIndex) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn foreign_key(mut self, foreign_key: ForeignKeyDescriptor) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }
}

impl SchemaSnapshot {
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "dialect": "mysql",
        "tables": {
            "user_post": {
                "structures": {
                    "id": {"type": "INT(11) UNSIGNED", "allowNull": false, "primaryKey": true, "autoIncrement": true},
                    "user_id": {"type": "INT(11) UNSIGNED", "allowNull": false},
                    "title": {"type": "VARCHAR(255)", "allowNull": false}
                },
                "indexes": [
                    {"name": "PRIMARY", "primary": true, "unique": true, "fields": [{"attribute": "id"}]}
                ],
                "foreignKeys": [
                    {"columnName": "user_id", "referencedTableName": "user", "referencedColumnName": "id"}
                ]
            },
            "user": {
                "columns": {
                    "id": {"type": "INT(11) UNSIGNED"}
                }
            }
        }
    }"#;

    #[test]
    fn snapshot_preserves_table_and_column_order() {
        let snapshot: SchemaSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.dialect, Some(SqlDialect::Mysql));
        assert_eq!(snapshot.table_names(), vec!["user_post", "user"]);

        let post = &snapshot.tables["user_post"];
        let columns: Vec<&str> = post.columns.keys().map(String::as_str).collect();
        assert_eq!(columns, vec!["id", "user_id", "title"]);
        assert_eq!(post.indexes.len(), 1);
        assert_eq!(post.foreign_keys[0].referenced_table_name.as_deref(), Some("user"));
    }

    #[test]
    fn snapshot_from_yaml() {
        let yaml = r#"
tables:
  user:
    comment: users
    columns:
      id:
        type: INT(11)
        allowNull: false
"#;
        let snapshot: SchemaSnapshot = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(snapshot.dialect, None);
        let user = &snapshot.tables["user"];
        assert_eq!(user.comment.as_deref(), Some("users"));
        assert!(!user.columns["id"].allow_null);
        assert!(user.indexes.is_empty());
    }

    #[test]
    fn builder_keeps_insertion_order() {
        let table = TableSchema::default()
            .column("b", ColumnDescriptor::new("INT"))
            .column("a", ColumnDescriptor::new("INT"));
        let names: Vec<&str> = table.columns.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
