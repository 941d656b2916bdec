use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FmError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The write target names an existing directory, so no file name was given.
    #[error("missing file name: {0} is a directory")]
    MissingFileName(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("cannot navigate to {0}")]
    Navigation(String),

    /// The copy half of a move landed, removing the original did not.
    #[error("file copied to {destination}, but failed to remove the original {source_path}: {reason}")]
    PartialMove {
        source_path: String,
        destination: String,
        reason: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl FmError {
    #[must_use]
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound(path.as_ref().display().to_string())
    }

    #[must_use]
    pub fn already_exists(path: impl AsRef<Path>) -> Self {
        Self::AlreadyExists(path.as_ref().display().to_string())
    }

    #[must_use]
    pub fn not_a_file(path: impl AsRef<Path>) -> Self {
        Self::NotAFile(path.as_ref().display().to_string())
    }

    #[must_use]
    pub fn not_a_directory(path: impl AsRef<Path>) -> Self {
        Self::NotADirectory(path.as_ref().display().to_string())
    }

    #[must_use]
    pub fn missing_file_name(path: impl AsRef<Path>) -> Self {
        Self::MissingFileName(path.as_ref().display().to_string())
    }

    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }

    #[must_use]
    pub fn navigation(path: impl AsRef<Path>) -> Self {
        Self::Navigation(path.as_ref().display().to_string())
    }

    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub fn is_partial_move(&self) -> bool {
        matches!(self, Self::PartialMove { .. })
    }

    /// Maps an OS error for `path` onto the engine's error kinds.
    #[must_use]
    pub fn from_io(err: &std::io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(path),
            std::io::ErrorKind::AlreadyExists => Self::already_exists(path),
            std::io::ErrorKind::NotADirectory => Self::not_a_directory(path),
            _ => Self::io(format!("{}: {}", path.display(), err)),
        }
    }
}

/// Outcome of every engine operation: `Ok` carries the data, `Err` the failure kind.
pub type FmResult<T> = Result<T, FmError>;
