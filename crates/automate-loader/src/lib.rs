pub mod config;
pub mod schema;

pub use config::{load_config, load_config_from_path, load_config_or_default};
pub use schema::{load_schema, select_tables};
