//! CLI command implementations

pub mod check;
pub mod completions;
pub mod generate;
pub mod init;
pub mod list;
