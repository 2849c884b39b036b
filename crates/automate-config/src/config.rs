use std::path::{Path, PathBuf};

use automate_core::SqlDialect;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dialect::OutputDialect;
use crate::error::ConfigError;
use crate::name_case::NameCase;

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "automate.json";

/// Top-level automate configuration (`automate.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct AutomateConfig {
    /// Output type: `js`, `ts`, `egg`, `midway` or `@ali/midway`.
    #[serde(default = "default_type")]
    pub r#type: String,
    /// SQL dialect of the schema snapshot. Falls back to the snapshot's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<SqlDialect>,
    /// Camel-case attribute keys and model names.
    #[serde(default)]
    pub camel_case: bool,
    /// Camel-case generated file names.
    #[serde(default)]
    pub file_name_camel_case: bool,
    /// Drop the `Model` / `_model` suffix from model names.
    #[serde(default)]
    pub omit_model_suffix: bool,
    /// Prepend `// @ts-nocheck` to TypeScript model files.
    #[serde(default)]
    pub ts_no_check: bool,
    /// Import alias for the midway package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_alias: Option<String>,
    /// Directory for model files.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Directory for definition files. Defaults to `dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types_dir: Option<PathBuf>,
    /// Remove previously generated files before writing.
    #[serde(default)]
    pub empty_dir: bool,
    /// Generate exactly these tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,
    /// Generate every table except these.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_tables: Option<Vec<String>>,
    /// Schema snapshot to read.
    #[serde(default = "default_schema")]
    pub schema: PathBuf,
}

fn default_type() -> String {
    "js".to_string()
}

fn default_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_schema() -> PathBuf {
    PathBuf::from("schema.json")
}

impl Default for AutomateConfig {
    fn default() -> Self {
        Self {
            r#type: default_type(),
            dialect: None,
            camel_case: false,
            file_name_camel_case: false,
            omit_model_suffix: false,
            ts_no_check: false,
            package_alias: None,
            dir: default_dir(),
            types_dir: None,
            empty_dir: false,
            tables: None,
            skip_tables: None,
            schema: default_schema(),
        }
    }
}

impl AutomateConfig {
    /// Directory for model artifacts.
    pub fn models_dir(&self) -> &Path {
        &self.dir
    }

    /// Directory for definition artifacts.
    pub fn types_dir(&self) -> &Path {
        self.types_dir.as_deref().unwrap_or(&self.dir)
    }

    pub fn naming(&self) -> NamingOptions {
        NamingOptions {
            field_case: NameCase::from_camel_flag(self.camel_case),
            file_case: NameCase::from_camel_flag(self.file_name_camel_case),
            omit_model_suffix: self.omit_model_suffix,
        }
    }

    /// Validate the configuration into the options record used by every
    /// pipeline stage.
    pub fn resolve(&self) -> Result<GenerateOptions, ConfigError> {
        let output =
            OutputDialect::from_name(&self.r#type, self.ts_no_check, self.package_alias.as_deref())?;
        Ok(GenerateOptions {
            output,
            sql_dialect: self.dialect.unwrap_or_default(),
            naming: self.naming(),
        })
    }
}

/// Naming preferences for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamingOptions {
    pub field_case: NameCase,
    pub file_case: NameCase,
    pub omit_model_suffix: bool,
}

impl NamingOptions {
    pub fn field_name(&self, column: &str) -> String {
        self.field_case.apply(column)
    }

    pub fn model_name(&self, table: &str) -> String {
        automate_naming::model_name(table, self.field_case.is_camel(), self.omit_model_suffix)
    }

    pub fn file_name(&self, table: &str) -> String {
        self.file_case.apply(table)
    }
}

/// The one options record threaded from the entry point through the
/// assembler and the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub output: OutputDialect,
    pub sql_dialect: SqlDialect,
    pub naming: NamingOptions,
}

impl GenerateOptions {
    pub fn new(output: OutputDialect) -> Self {
        Self {
            output,
            sql_dialect: SqlDialect::default(),
            naming: NamingOptions::default(),
        }
    }

    pub fn with_sql_dialect(mut self, sql_dialect: SqlDialect) -> Self {
        self.sql_dialect = sql_dialect;
        self
    }

    pub fn with_naming(mut self, naming: NamingOptions) -> Self {
        self.naming = naming;
        self
    }
}
