//! Sequelize model generation from schema snapshots.
//!
//! ```no_run
//! use automate::{Automate, AutomateConfig, SchemaSnapshot};
//!
//! # fn run(snapshot: SchemaSnapshot) -> Result<(), automate::Error> {
//! let config = AutomateConfig {
//!     r#type: "ts".into(),
//!     ..Default::default()
//! };
//! let report = Automate::from_config(&config, &snapshot)?.generate(&snapshot)?;
//! for artifact in &report.artifacts {
//!     println!("{}", artifact.relative_path.display());
//! }
//! # Ok(())
//! # }
//! ```

use automate_definition::assemble_all;
use thiserror::Error;

pub use automate_config::{
    AutomateConfig, ConfigError, GenerateOptions, NamingOptions, OutputDialect,
};
pub use automate_core::{
    ArtifactKind, GeneratedArtifact, ModelDefinition, SchemaSnapshot, SqlDialect, TableSchema,
};
pub use automate_definition::AssembleError;
pub use automate_exporter::{Diagnostic, ExportError, GenerationReport, TableFailure};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One generation run over a fixed set of options.
#[derive(Debug, Clone)]
pub struct Automate {
    options: GenerateOptions,
}

impl Automate {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Resolve `config` for `snapshot`. A config without a `dialect` takes
    /// the snapshot's own.
    pub fn from_config(config: &AutomateConfig, snapshot: &SchemaSnapshot) -> Result<Self, Error> {
        let options = config.resolve()?;
        let sql_dialect = config.dialect.or(snapshot.dialect).unwrap_or_default();
        Ok(Self::new(options.with_sql_dialect(sql_dialect)))
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Assemble one definition per table. Tables that fail are returned
    /// separately, in table order.
    pub fn definitions(&self, snapshot: &SchemaSnapshot) -> (Vec<ModelDefinition>, Vec<TableFailure>) {
        let mut definitions = Vec::with_capacity(snapshot.tables.len());
        let mut failures = Vec::new();
        for (table, result) in assemble_all(snapshot, &self.options) {
            match result {
                Ok(definition) => definitions.push(definition),
                Err(err) => failures.push(TableFailure {
                    table,
                    error: err.to_string(),
                }),
            }
        }
        (definitions, failures)
    }

    /// Run the whole pipeline. Assembly failures are reported next to the
    /// synthesis failures.
    pub fn generate(&self, snapshot: &SchemaSnapshot) -> Result<GenerationReport, Error> {
        let (definitions, failures) = self.definitions(snapshot);
        tracing::debug!(
            dialect = self.options.output.name(),
            tables = definitions.len(),
            failed = failures.len(),
            "assembled definitions"
        );

        let mut report = automate_exporter::generate(&definitions, &self.options)?;
        let mut all_failures = failures;
        all_failures.append(&mut report.failures);
        report.failures = all_failures;
        Ok(report)
    }
}
