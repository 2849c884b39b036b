pub mod config;
pub mod dialect;
pub mod error;
pub mod file_format;
pub mod name_case;

pub use config::{AutomateConfig, GenerateOptions, NamingOptions, CONFIG_FILE_NAME};
pub use dialect::{MidwayOptions, OutputDialect, TypeScriptOptions};
pub use error::ConfigError;
pub use file_format::FileFormat;
pub use name_case::NameCase;
