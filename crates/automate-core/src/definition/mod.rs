pub mod attribute;
pub mod data_type;
pub mod default_value;
pub mod model;

pub use attribute::{AttributeDescriptor, ForeignKeyRef};
pub use data_type::CanonicalType;
pub use default_value::DefaultValue;
pub use model::{IndexDescriptor, ModelDefinition};
