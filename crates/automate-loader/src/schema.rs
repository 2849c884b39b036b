use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use automate_config::FileFormat;
use automate_core::SchemaSnapshot;
use indexmap::IndexMap;

/// Load a schema snapshot from a JSON or YAML file.
pub fn load_schema(path: &Path) -> Result<SchemaSnapshot> {
    let format = FileFormat::from_path(path).with_context(|| {
        format!(
            "unsupported schema file extension: {} (expected .json, .yaml or .yml)",
            path.display()
        )
    })?;

    let content = fs::read_to_string(path)
        .with_context(|| format!("read schema file: {}", path.display()))?;

    let snapshot: SchemaSnapshot = if format.is_yaml() {
        serde_yaml::from_str(&content)
            .with_context(|| format!("parse YAML schema: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("parse JSON schema: {}", path.display()))?
    };

    tracing::debug!(
        path = %path.display(),
        tables = snapshot.tables.len(),
        "loaded schema snapshot"
    );
    Ok(snapshot)
}

/// Restrict a snapshot to the configured tables.
///
/// `tables` keeps exactly the named tables in the given order and wins over
/// `skip_tables`. Every named table must exist in the snapshot.
pub fn select_tables(
    mut snapshot: SchemaSnapshot,
    tables: Option<&[String]>,
    skip_tables: Option<&[String]>,
) -> Result<SchemaSnapshot> {
    if let Some(tables) = tables {
        let mut selected = IndexMap::with_capacity(tables.len());
        for name in tables {
            let (name, table) = snapshot
                .tables
                .shift_remove_entry(name)
                .with_context(|| format!("table '{}' not found in schema", name))?;
            selected.insert(name, table);
        }
        snapshot.tables = selected;
        return Ok(snapshot);
    }

    if let Some(skip_tables) = skip_tables {
        for name in skip_tables {
            if snapshot.tables.shift_remove(name).is_none() {
                anyhow::bail!("skipped table '{}' not found in schema", name);
            }
        }
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use automate_core::{ColumnDescriptor, TableSchema};
    use rstest::rstest;
    use tempfile::tempdir;

    fn snapshot() -> SchemaSnapshot {
        let mut snapshot = SchemaSnapshot::default();
        for name in ["user", "user_post", "tag"] {
            snapshot.tables.insert(
                name.to_string(),
                TableSchema::default().column("id", ColumnDescriptor::new("INT(11)").not_null()),
            );
        }
        snapshot
    }

    fn names(snapshot: &SchemaSnapshot) -> Vec<&str> {
        snapshot.table_names()
    }

    const JSON: &str = r#"{
        "dialect": "mysql",
        "tables": {
            "user": {
                "structures": {
                    "id": {"type": "INT(11)", "allowNull": false, "primaryKey": true}
                }
            }
        }
    }"#;

    const YAML: &str = "dialect: mysql\ntables:\n  user:\n    columns:\n      id:\n        type: INT(11)\n        allowNull: false\n        primaryKey: true\n";

    #[rstest]
    #[case("schema.json", JSON)]
    #[case("schema.yaml", YAML)]
    #[case("schema.yml", YAML)]
    fn load_schema_reads_supported_formats(#[case] file: &str, #[case] content: &str) {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(file);
        fs::write(&path, content).unwrap();

        let snapshot = load_schema(&path).unwrap();
        assert_eq!(names(&snapshot), vec!["user"]);
        let id = &snapshot.tables["user"].columns["id"];
        assert!(id.primary_key);
        assert!(!id.allow_null);
    }

    #[test]
    fn load_schema_rejects_unknown_extension() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("schema.toml");
        fs::write(&path, "").unwrap();

        let err = load_schema(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported schema file extension"));
    }

    #[test]
    fn load_schema_reports_missing_file() {
        let tmp = tempdir().unwrap();
        let err = load_schema(&tmp.path().join("schema.json")).unwrap_err();
        assert!(err.to_string().starts_with("read schema file"));
    }

    #[test]
    fn load_schema_reports_parse_errors() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("schema.json");
        fs::write(&path, r#"{"tables": 3}"#).unwrap();

        let err = load_schema(&path).unwrap_err();
        assert!(err.to_string().starts_with("parse JSON schema"));
    }

    #[test]
    fn select_tables_without_filters_keeps_everything() {
        let selected = select_tables(snapshot(), None, None).unwrap();
        assert_eq!(names(&selected), vec!["user", "user_post", "tag"]);
    }

    #[test]
    fn select_tables_keeps_requested_order() {
        let tables = vec!["tag".to_string(), "user".to_string()];
        let selected = select_tables(snapshot(), Some(&tables), None).unwrap();
        assert_eq!(names(&selected), vec!["tag", "user"]);
    }

    #[test]
    fn select_tables_wins_over_skip_tables() {
        let tables = vec!["user".to_string()];
        let skip = vec!["user".to_string()];
        let selected = select_tables(snapshot(), Some(&tables), Some(&skip)).unwrap();
        assert_eq!(names(&selected), vec!["user"]);
    }

    #[test]
    fn skip_tables_removes_and_keeps_order() {
        let skip = vec!["user".to_string()];
        let selected = select_tables(snapshot(), None, Some(&skip)).unwrap();
        assert_eq!(names(&selected), vec!["user_post", "tag"]);
    }

    #[rstest]
    #[case(Some(vec!["missing".to_string()]), None, "table 'missing' not found in schema")]
    #[case(None, Some(vec!["missing".to_string()]), "skipped table 'missing' not found in schema")]
    fn unknown_tables_are_errors(
        #[case] tables: Option<Vec<String>>,
        #[case] skip: Option<Vec<String>>,
        #[case] message: &str,
    ) {
        let err = select_tables(snapshot(), tables.as_deref(), skip.as_deref()).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}
