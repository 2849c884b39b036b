use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("index references non-existent column: {0}.{1} -> {2}")]
    IndexColumnNotFound(String, String, String),
    #[error("foreign key references non-existent column: {0}.{1}")]
    ForeignKeyColumnNotFound(String, String),
    #[error("duplicate attribute key '{2}' in table {0} (from column '{1}')")]
    DuplicateAttributeKey(String, String, String),
    #[error("table '{0}' has more than one primary index: '{1}' and '{2}'")]
    MultiplePrimaryIndexes(String, String, String),
}
