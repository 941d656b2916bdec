//! fmsh - Interactive file manager shell
//!
//! This crate provides:
//! - The command dispatcher: one input line in, one command run, output out
//! - Quote-aware argument parsing for two-path commands
//! - The output layer: plain lines, streamed files, and directory tables
//!
//! Filesystem work is done by [`fmsh_core::FileEngine`].

pub mod command;
pub mod error;
pub mod messages;
pub mod output;
pub mod shell;

pub use command::{split_args, Command, OsFlag, PathPair};
pub use error::{ShellError, ShellResult};
pub use output::Output;
pub use shell::{Shell, DEFAULT_USERNAME};
