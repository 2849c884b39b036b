use std::collections::HashMap;

use automate_config::GenerateOptions;
use automate_core::{
    AttributeDescriptor, ForeignKeyRef, IndexDescriptor, ModelDefinition, SchemaSnapshot,
    TableSchema,
};
use indexmap::IndexMap;

use crate::error::AssembleError;
use crate::normalize::{derive_auto_increment, normalize_default, normalize_type};

/// Build the model definition for one table.
///
/// Attribute order follows column order. Primary indexes mark their members,
/// single-column unique indexes become the attribute's `unique` name, and
/// every other index is carried over as-is. Foreign-key targets are named
/// with the run's naming convention without checking that the table exists.
pub fn assemble(
    table_name: &str,
    table: &TableSchema,
    options: &GenerateOptions,
) -> Result<ModelDefinition, AssembleError> {
    let naming = &options.naming;
    let dialect = options.sql_dialect;

    let mut attributes: IndexMap<String, AttributeDescriptor> = IndexMap::new();
    // column name -> attribute key
    let mut keys: HashMap<&str, String> = HashMap::new();

    for (column_name, column) in &table.columns {
        let key = naming.field_name(column_name);
        if attributes.contains_key(&key) {
            return Err(AssembleError::DuplicateAttributeKey(
                table_name.to_string(),
                column_name.clone(),
                key,
            ));
        }
        let attribute = AttributeDescriptor {
            name: key.clone(),
            field: column_name.clone(),
            r#type: normalize_type(&column.r#type, dialect),
            allow_null: column.allow_null,
            default_value: normalize_default(column, dialect),
            primary_key: column.primary_key,
            auto_increment: derive_auto_increment(column, dialect),
            unique: None,
            references: None,
            comment: column.comment.clone(),
        };
        keys.insert(column_name.as_str(), key.clone());
        attributes.insert(key, attribute);
    }

    let mut indexes = Vec::new();
    let mut primary_index: Option<&str> = None;

    for index in &table.indexes {
        let columns = index.column_names();
        let member_keys = columns
            .iter()
            .map(|column| {
                keys.get(column.as_str()).cloned().ok_or_else(|| {
                    AssembleError::IndexColumnNotFound(
                        table_name.to_string(),
                        index.name.clone(),
                        column.clone(),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if index.primary {
            if let Some(previous) = primary_index {
                return Err(AssembleError::MultiplePrimaryIndexes(
                    table_name.to_string(),
                    previous.to_string(),
                    index.name.clone(),
                ));
            }
            primary_index = Some(index.name.as_str());
            for key in &member_keys {
                if let Some(attribute) = attributes.get_mut(key) {
                    attribute.primary_key = true;
                }
            }
        } else if index.unique && member_keys.len() == 1 {
            if let Some(attribute) = attributes.get_mut(&member_keys[0]) {
                attribute.unique = Some(index.name.clone());
            }
        } else {
            indexes.push(IndexDescriptor {
                name: index.name.clone(),
                unique: index.unique,
                method: index.method.clone(),
                fields: columns,
            });
        }
    }

    for foreign_key in &table.foreign_keys {
        let (Some(target_table), Some(target_column)) = (
            foreign_key.referenced_table_name.as_deref(),
            foreign_key.referenced_column_name.as_deref(),
        ) else {
            continue;
        };
        let key = keys.get(foreign_key.column_name.as_str()).ok_or_else(|| {
            AssembleError::ForeignKeyColumnNotFound(
                table_name.to_string(),
                foreign_key.column_name.clone(),
            )
        })?;
        if let Some(attribute) = attributes.get_mut(key) {
            attribute.references = Some(ForeignKeyRef {
                key: target_column.to_string(),
                model: naming.model_name(target_table),
            });
        }
    }

    tracing::debug!(
        table = table_name,
        attributes = attributes.len(),
        indexes = indexes.len(),
        "assembled model definition"
    );

    Ok(ModelDefinition {
        model_name: naming.model_name(table_name),
        model_file_name: naming.file_name(table_name),
        table_name: table_name.to_string(),
        table_comment: table.comment.clone(),
        attributes,
        indexes,
    })
}

/// Assemble every table of a snapshot, keeping one result per table so a
/// failing table does not stop its siblings.
pub fn assemble_all(
    snapshot: &SchemaSnapshot,
    options: &GenerateOptions,
) -> Vec<(String, Result<ModelDefinition, AssembleError>)> {
    snapshot
        .tables
        .iter()
        .map(|(name, table)| {
            let result = assemble(name, table, options);
            if let Err(err) = &result {
                tracing::warn!(table = name.as_str(), error = %err, "failed to assemble table");
            }
            (name.clone(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use automate_config::{NameCase, NamingOptions, OutputDialect};
    use automate_core::{
        CanonicalType, ColumnDescriptor, DefaultValue, ForeignKeyDescriptor, IndexField, RawIndex,
        SqlDialect,
    };
    use rstest::{fixture, rstest};

    fn index(name: &str, primary: bool, unique: bool, fields: &[&str]) -> RawIndex {
        RawIndex {
            name: name.to_string(),
            primary,
            unique,
            method: Some("BTREE".to_string()),
            fields: fields.iter().map(|f| IndexField::from(*f)).collect(),
        }
    }

    fn options(camel: bool) -> GenerateOptions {
        GenerateOptions::new(OutputDialect::JavaScript).with_naming(NamingOptions {
            field_case: NameCase::from_camel_flag(camel),
            file_case: NameCase::Preserve,
            omit_model_suffix: false,
        })
    }

    #[fixture]
    fn user_post() -> TableSchema {
        TableSchema {
            comment: Some("posts".into()),
            ..Default::default()
        }
        .column(
            "id",
            ColumnDescriptor::new("INT(11) UNSIGNED")
                .not_null()
                .with_auto_increment(true),
        )
        .column("user_id", ColumnDescriptor::new("INT(11) UNSIGNED").not_null())
        .column("title", ColumnDescriptor::new("VARCHAR(255)").not_null())
        .column("slug", ColumnDescriptor::new("VARCHAR(100)").not_null())
        .column(
            "created_at",
            ColumnDescriptor::new("DATETIME").with_default("CURRENT_TIMESTAMP"),
        )
        .index(index("PRIMARY", true, true, &["id"]))
        .index(index("uk_slug", false, true, &["slug"]))
        .index(index("idx_user_title", false, false, &["user_id", "title"]))
        .foreign_key(ForeignKeyDescriptor::new("user_id", "user", "id"))
    }

    #[rstest]
    fn attributes_follow_column_order(user_post: TableSchema) {
        for camel in [false, true] {
            let def = assemble("user_post", &user_post, &options(camel)).unwrap();
            let fields: Vec<&str> = def.attributes.values().map(|a| a.field.as_str()).collect();
            assert_eq!(fields, vec!["id", "user_id", "title", "slug", "created_at"]);
        }
    }

    #[rstest]
    fn camel_case_keys_keep_source_column(user_post: TableSchema) {
        let def = assemble("user_post", &user_post, &options(true)).unwrap();
        assert_eq!(def.model_name, "userPostModel");
        assert_eq!(def.model_file_name, "user_post");
        let attribute = def.attribute("createdAt").unwrap();
        assert_eq!(attribute.field, "created_at");
        assert_eq!(
            attribute.default_value,
            DefaultValue::Expression("sequelize.literal('CURRENT_TIMESTAMP')".into())
        );
    }

    #[rstest]
    fn indexes_are_folded_or_carried(user_post: TableSchema) {
        let def = assemble("user_post", &user_post, &options(false)).unwrap();

        let id = def.attribute("id").unwrap();
        assert!(id.primary_key);
        assert!(id.auto_increment);
        assert_eq!(def.attribute("slug").unwrap().unique.as_deref(), Some("uk_slug"));

        assert_eq!(def.indexes.len(), 1);
        let carried = &def.indexes[0];
        assert_eq!(carried.name, "idx_user_title");
        assert!(!carried.unique);
        assert_eq!(carried.method.as_deref(), Some("BTREE"));
        assert_eq!(carried.fields, vec!["user_id", "title"]);
        assert_eq!(def.table_comment.as_deref(), Some("posts"));
    }

    #[test]
    fn composite_primary_index_marks_both_members() {
        let table = TableSchema::default()
            .column("user_id", ColumnDescriptor::new("INT").not_null())
            .column("role_id", ColumnDescriptor::new("INT").not_null())
            .index(index("PRIMARY", true, true, &["user_id", "role_id"]));
        let def = assemble("user_role", &table, &options(false)).unwrap();
        assert!(def.indexes.is_empty());
        assert_eq!(def.primary_keys().count(), 2);
    }

    #[test]
    fn multi_column_unique_index_stays_in_indexes() {
        let table = TableSchema::default()
            .column("a", ColumnDescriptor::new("INT"))
            .column("b", ColumnDescriptor::new("INT"))
            .index(index("uk_a_b", false, true, &["a", "b"]));
        let def = assemble("pair", &table, &options(false)).unwrap();
        assert_eq!(def.indexes.len(), 1);
        assert!(def.indexes[0].unique);
        assert!(def.attributes.values().all(|a| a.unique.is_none()));
    }

    #[rstest]
    #[case(false, "user_model")]
    #[case(true, "userModel")]
    fn foreign_key_target_follows_naming(
        user_post: TableSchema,
        #[case] camel: bool,
        #[case] expected: &str,
    ) {
        let def = assemble("user_post", &user_post, &options(camel)).unwrap();
        let key = if camel { "userId" } else { "user_id" };
        let references = def.attribute(key).unwrap().references.as_ref().unwrap();
        assert_eq!(references.key, "id");
        assert_eq!(references.model, expected);
    }

    #[test]
    fn foreign_key_without_target_is_ignored() {
        let table = TableSchema::default()
            .column("owner", ColumnDescriptor::new("INT"))
            .foreign_key(ForeignKeyDescriptor {
                constraint_name: Some("fk_owner".into()),
                column_name: "owner".into(),
                referenced_table_name: None,
                referenced_column_name: None,
            });
        let def = assemble("thing", &table, &options(false)).unwrap();
        assert!(def.attribute("owner").unwrap().references.is_none());
    }

    #[test]
    fn index_on_unknown_column_fails() {
        let table = TableSchema::default()
            .column("id", ColumnDescriptor::new("INT"))
            .index(index("idx_missing", false, false, &["missing"]));
        assert_eq!(
            assemble("broken", &table, &options(false)),
            Err(AssembleError::IndexColumnNotFound(
                "broken".into(),
                "idx_missing".into(),
                "missing".into()
            ))
        );
    }

    #[test]
    fn foreign_key_on_unknown_column_fails() {
        let table = TableSchema::default()
            .column("id", ColumnDescriptor::new("INT"))
            .foreign_key(ForeignKeyDescriptor::new("owner_id", "user", "id"));
        assert_eq!(
            assemble("broken", &table, &options(false)),
            Err(AssembleError::ForeignKeyColumnNotFound(
                "broken".into(),
                "owner_id".into()
            ))
        );
    }

    #[test]
    fn case_folding_collision_fails() {
        let table = TableSchema::default()
            .column("user_id", ColumnDescriptor::new("INT"))
            .column("userId", ColumnDescriptor::new("INT"));
        assert!(assemble("dup", &table, &options(false)).is_ok());
        assert_eq!(
            assemble("dup", &table, &options(true)),
            Err(AssembleError::DuplicateAttributeKey(
                "dup".into(),
                "userId".into(),
                "userId".into()
            ))
        );
    }

    #[test]
    fn second_primary_index_fails() {
        let table = TableSchema::default()
            .column("a", ColumnDescriptor::new("INT"))
            .column("b", ColumnDescriptor::new("INT"))
            .index(index("PRIMARY", true, true, &["a"]))
            .index(index("pk_b", true, true, &["b"]));
        assert!(matches!(
            assemble("twice", &table, &options(false)),
            Err(AssembleError::MultiplePrimaryIndexes(..))
        ));
    }

    #[test]
    fn assemble_all_isolates_failures() {
        let mut snapshot = SchemaSnapshot::default();
        snapshot.tables.insert(
            "broken".into(),
            TableSchema::default()
                .column("id", ColumnDescriptor::new("INT"))
                .index(index("idx", false, false, &["nope"])),
        );
        snapshot.tables.insert(
            "user".into(),
            TableSchema::default().column("id", ColumnDescriptor::new("uuid")),
        );

        let options = options(false).with_sql_dialect(SqlDialect::Postgres);
        let results = assemble_all(&snapshot, &options);
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_err());
        let user = results[1].1.as_ref().unwrap();
        assert_eq!(results[1].0, "user");
        assert_eq!(user.attribute("id").unwrap().r#type, CanonicalType::Uuid);
    }
}
