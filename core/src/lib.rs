//! FMSH Core
//!
//! The filesystem side of the fmsh shell:
//! - [`FileEngine`]: the session's current directory and every file action
//! - [`Pipeline`]: source → transform → sink streaming used by copy, hash and brotli
//! - [`OsSnapshot`]: host facts for the `os` command

pub mod engine;
pub mod error;
pub mod os_info;
pub mod pipeline;
pub mod types;

pub use async_compression::Level;
pub use engine::{normalize, EngineOptions, FileEngine, DEFAULT_ARCHIVE_SUFFIX};
pub use error::{FmError, FmResult};
pub use os_info::{CpuInfo, OsSnapshot};
pub use pipeline::{DigestSink, Pipeline, Transform, DEFAULT_BUFFER_SIZE};
pub use types::{DirEntry, EntryKind};
