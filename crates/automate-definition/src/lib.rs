pub mod assemble;
pub mod error;
pub mod normalize;

pub use assemble::{assemble, assemble_all};
pub use error::AssembleError;
pub use normalize::{derive_auto_increment, normalize_default, normalize_type};
