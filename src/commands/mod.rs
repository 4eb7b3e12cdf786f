//! CLI subcommand implementations.

pub mod init;
pub mod play;
pub mod serve;
