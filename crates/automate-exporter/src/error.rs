use automate_template::{ParseError, RenameError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Templates are built in, so this aborts the whole run.
    #[error("built-in template `{template}` failed to parse: {source}")]
    Template {
        template: &'static str,
        #[source]
        source: ParseError,
    },
    #[error("table `{table}`: `{identifier}` cannot be used as a model identifier")]
    InvalidIdentifier { table: String, identifier: String },
    #[error("table `{table}`: {artifact}: {source}")]
    NameCollision {
        table: String,
        artifact: String,
        #[source]
        source: RenameError,
    },
    #[error("table `{table}`: `{path}` is already generated in this run")]
    DuplicatePath { table: String, path: String },
}
