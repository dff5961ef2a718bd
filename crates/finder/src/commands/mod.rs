//! Command handlers, one module per subcommand.

pub mod completion;
pub mod config_cmd;
pub mod eval;
pub mod init;
pub mod normalize;
pub mod profile;
pub mod search;
pub mod validate;
pub mod version;
