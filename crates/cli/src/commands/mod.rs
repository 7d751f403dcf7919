//! CLI subcommand implementations.

pub mod init_db;
pub mod migrate;
