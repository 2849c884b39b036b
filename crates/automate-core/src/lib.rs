pub mod artifact;
pub mod definition;
pub mod schema;

pub use artifact::{ArtifactKind, GeneratedArtifact};
pub use definition::{
    AttributeDescriptor, CanonicalType, DefaultValue, ForeignKeyRef, IndexDescriptor,
    ModelDefinition,
};
pub use schema::{
    ColumnDescriptor, ColumnName, ForeignKeyDescriptor, IndexField, RawDefault, RawIndex,
    SchemaSnapshot, SqlDialect, TableName, TableSchema,
};
