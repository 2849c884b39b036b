pub mod definitions;
pub mod generate;
pub mod init;

pub use definitions::cmd_definitions;
pub use generate::{GenerateArgs, cmd_generate};
pub use init::cmd_init;
