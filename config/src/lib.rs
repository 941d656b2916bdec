//! FMSH Configuration System
//!
//! YAML configuration for the fmsh shell.
//!
//! # Configuration Loading Priority
//!
//! 1. Compiled-in defaults
//! 2. `~/.config/fmsh/fmsh.yaml` (user)
//! 3. `./fmsh.yaml` (project-local)
//! 4. `--config <file>`, else `FMSH_CONFIG=/path/to/config.yaml` (explicit, replaces 2 and 3)
//! 5. Environment variables (highest priority)
//!
//! # Example Configuration
//!
//! ```yaml
//! shell:
//!   prompt: "{user}:{cwd}> "
//!   start_dir: "~/projects"
//!   history:
//!     file: "~/.fmsh_history"
//!
//! engine:
//!   buffer_size: 65536
//!   compression: best
//!   archive_suffix: ".br"
//!
//! logging:
//!   level: warn
//! ```

#![allow(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{expand_home, ConfigLoader};
pub use types::*;

/// Load configuration from default locations.
///
/// Searches for config files in order and merges them.
/// Environment variables override file values.
pub fn load() -> Result<FmshConfig, ConfigError> {
    ConfigLoader::new().load()
}

/// Load configuration from a specific file.
pub fn load_from_file(path: &str) -> Result<FmshConfig, ConfigError> {
    ConfigLoader::new().with_file(path).load()
}
