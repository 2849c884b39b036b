use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported output type: {0} (expected one of: js, ts, egg, midway, @ali/midway)")]
    UnsupportedDialect(String),
    #[error("output type '{0}' does not support a package alias")]
    PackageAliasUnsupported(String),
    #[error("package alias must not be empty")]
    EmptyPackageAlias,
}
