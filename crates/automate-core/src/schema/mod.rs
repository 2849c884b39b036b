pub mod column;
pub mod dialect;
pub mod foreign_key;
pub mod index;
pub mod names;
pub mod raw_default;
pub mod table;

pub use column::ColumnDescriptor;
pub use dialect::SqlDialect;
pub use foreign_key::ForeignKeyDescriptor;
pub use index::{IndexField, RawIndex};
pub use names::{ColumnName, IndexName, TableName};
pub use raw_default::RawDefault;
pub use table::{SchemaSnapshot, TableSchema};
