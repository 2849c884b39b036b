#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// SQL dialect of the database the schema snapshot was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Mysql,
    Mariadb,
    Postgres,
    Mssql,
    Sqlite,
}

impl SqlDialect {
    pub fn is_postgres(self) -> bool {
        matches!(self, SqlDialect::Postgres)
    }

    pub fn is_mssql(self) -> bool {
        matches!(self, SqlDialect::Mssql)
    }
}
