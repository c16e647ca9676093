//! One module per subcommand, each exposing an `execute` entry point.

pub mod cleanup;
pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod new;
