//! Error types for fmsh

use thiserror::Error;

/// Result type alias for fmsh operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Error types for fmsh shell operations
#[derive(Error, Debug)]
pub enum ShellError {
    /// Engine failure (file operations, navigation)
    #[error("{0}")]
    Fm(#[from] fmsh_core::FmError),

    /// IO error writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor error
    #[error("Readline error: {0}")]
    Readline(String),

    /// Exit requested (not really an error)
    #[error("Exit with code {0}")]
    Exit(i32),
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err.to_string())
    }
}
