//! The file engine: current-directory state plus every filesystem action.

use crate::error::{FmError, FmResult};
use crate::pipeline::{DigestSink, Pipeline, Transform, DEFAULT_BUFFER_SIZE};
use crate::types::{sort_dirs_first, DirEntry, EntryKind};
use async_compression::Level;
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub const DEFAULT_ARCHIVE_SUFFIX: &str = ".br";

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Read buffer used by every pipeline.
    pub buffer_size: usize,
    pub compression: Level,
    /// Appended to the destination of `compress`.
    pub archive_suffix: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            compression: Level::Default,
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_string(),
        }
    }
}

pub struct FileEngine {
    cwd: PathBuf,
    options: EngineOptions,
}

impl FileEngine {
    /// Starts a session in `start_dir`, which must be an existing directory.
    pub async fn new(start_dir: impl AsRef<Path>) -> FmResult<Self> {
        let start = normalize(start_dir.as_ref());
        if !is_directory(&start).await {
            return Err(FmError::navigation(&start));
        }

        Ok(Self {
            cwd: start,
            options: EngineOptions::default(),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.cwd
    }

    /// Absolute, lexically normalized form of `path` relative to the current directory.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        normalize(&self.cwd.join(path))
    }

    /// Moves to the parent directory. At the root this succeeds without moving.
    pub async fn up(&mut self) -> FmResult<()> {
        let Some(parent) = self.cwd.parent().map(Path::to_path_buf) else {
            debug!(cwd = %self.cwd.display(), "already at root");
            return Ok(());
        };

        if !is_directory(&parent).await {
            return Err(FmError::navigation(&parent));
        }

        debug!(from = %self.cwd.display(), to = %parent.display(), "up");
        self.cwd = parent;
        Ok(())
    }

    /// Changes the current directory. The target must be an existing directory,
    /// otherwise the current directory is left as it was.
    pub async fn change_dir(&mut self, target: &str) -> FmResult<()> {
        let next = drive_root(target).unwrap_or_else(|| self.resolve(target));

        if !is_directory(&next).await {
            return Err(FmError::navigation(&next));
        }

        debug!(from = %self.cwd.display(), to = %next.display(), "cd");
        self.cwd = next;
        Ok(())
    }

    /// Immediate children of the current directory, directories first.
    pub async fn list_dir(&self) -> FmResult<Vec<DirEntry>> {
        let dir = &self.cwd;
        let mut reader = fs::read_dir(dir)
            .await
            .map_err(|e| FmError::from_io(&e, dir))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| FmError::from_io(&e, dir))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| FmError::from_io(&e, entry.path()))?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Directory
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }

        sort_dirs_first(&mut entries);
        Ok(entries)
    }

    /// Opens `path` (relative to the current directory) for reading without reading from it.
    pub async fn open_read_stream(&self, path: &str) -> FmResult<File> {
        let path = self.resolve(path);
        File::open(&path)
            .await
            .map_err(|e| FmError::io(format!("{}: {e}", path.display())))
    }

    /// Opens `path` for writing, creating or truncating it.
    pub async fn open_write_stream(&self, path: &Path) -> FmResult<File> {
        File::create(path)
            .await
            .map_err(|e| FmError::io(format!("{}: {e}", path.display())))
    }

    /// Creates a new file; fails if anything already exists at that path.
    pub async fn create_file(&self, name: &str, content: &[u8]) -> FmResult<PathBuf> {
        let path = self.resolve(name);
        let mut file = create_exclusive(&path).await?;
        file.write_all(content)
            .await
            .map_err(|e| FmError::from_io(&e, &path))?;
        file.flush().await.map_err(|e| FmError::from_io(&e, &path))?;

        debug!(path = %path.display(), "created file");
        Ok(path)
    }

    pub async fn remove_file(&self, name: &str) -> FmResult<()> {
        let path = self.resolve(name);
        fs::remove_file(&path)
            .await
            .map_err(|e| FmError::from_io(&e, &path))?;

        debug!(path = %path.display(), "removed file");
        Ok(())
    }

    pub async fn rename_file(&self, old: &str, new: &str) -> FmResult<()> {
        let from = self.resolve(old);
        let to = self.resolve(new);
        require_file(&from).await?;

        fs::rename(&from, &to)
            .await
            .map_err(|e| FmError::from_io(&e, &from))?;

        debug!(from = %from.display(), to = %to.display(), "renamed file");
        Ok(())
    }

    /// Streams `src` into `dest_dir`, keeping its file name. Returns the new path.
    pub async fn copy_file(&self, src: &str, dest_dir: &str) -> FmResult<PathBuf> {
        let source = self.resolve(src);
        let dest_dir = self.resolve(dest_dir);
        require_file(&source).await?;
        if !metadata(&dest_dir).await?.is_dir() {
            return Err(FmError::not_a_directory(&dest_dir));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| FmError::not_a_file(&source))?;
        let target = dest_dir.join(file_name);
        if target == source || same_file(&source, &target).await {
            return Err(FmError::already_exists(&target));
        }

        let reader = File::open(&source)
            .await
            .map_err(|e| FmError::io(format!("{}: {e}", source.display())))?;
        let writer = self.open_write_stream(&target).await?;
        let (bytes, _) = Pipeline::new(reader, writer)
            .buffer_size(self.options.buffer_size)
            .run()
            .await
            .map_err(|e| {
                FmError::io(format!(
                    "copy {} -> {}: {e}",
                    source.display(),
                    target.display()
                ))
            })?;

        debug!(from = %source.display(), to = %target.display(), bytes, "copied file");
        Ok(target)
    }

    /// Copy followed by removal of the source.
    ///
    /// A copy failure is returned as is. If the copy landed but the source
    /// could not be removed the result is [`FmError::PartialMove`].
    pub async fn move_file(&self, src: &str, dest_dir: &str) -> FmResult<PathBuf> {
        let target = self.copy_file(src, dest_dir).await?;
        let removal = self.remove_file(src).await;
        finish_move(&self.resolve(src), target, removal)
    }

    /// SHA-256 of the file contents as lowercase hex.
    pub async fn compute_hash(&self, path: &str) -> FmResult<String> {
        let reader = self.open_read_stream(path).await?;
        let (bytes, sink) = Pipeline::new(reader, DigestSink::new())
            .buffer_size(self.options.buffer_size)
            .run()
            .await
            .map_err(|e| FmError::io(format!("hash {path}: {e}")))?;

        debug!(path, bytes, "hashed file");
        Ok(sink.hex_digest())
    }

    /// Brotli-compresses `src` into `dest` plus the archive suffix.
    pub async fn compress(&self, src: &str, dest: &str) -> FmResult<PathBuf> {
        let mut target = self.resolve(dest).into_os_string();
        target.push(&self.options.archive_suffix);
        let target = PathBuf::from(target);

        self.run_brotli(src, target, Transform::BrotliCompress(self.options.compression))
            .await
    }

    /// Brotli-decompresses `src` into `dest` as given.
    pub async fn decompress(&self, src: &str, dest: &str) -> FmResult<PathBuf> {
        let target = self.resolve(dest);
        self.run_brotli(src, target, Transform::BrotliDecompress).await
    }

    async fn run_brotli(
        &self,
        src: &str,
        target: PathBuf,
        transform: Transform,
    ) -> FmResult<PathBuf> {
        let source = self.resolve(src);
        require_file(&source).await?;

        match fs::metadata(&target).await {
            Ok(meta) if meta.is_dir() => return Err(FmError::missing_file_name(&target)),
            Ok(_) => return Err(FmError::already_exists(&target)),
            Err(_) => {}
        }

        let reader = File::open(&source)
            .await
            .map_err(|e| FmError::io(format!("{}: {e}", source.display())))?;
        let writer = create_exclusive(&target).await?;
        let (bytes, _) = Pipeline::new(reader, writer)
            .transform(transform)
            .buffer_size(self.options.buffer_size)
            .run()
            .await
            .map_err(|e| {
                FmError::io(format!(
                    "{} -> {}: {e}",
                    source.display(),
                    target.display()
                ))
            })?;

        debug!(from = %source.display(), to = %target.display(), bytes, ?transform, "brotli");
        Ok(target)
    }
}

/// Result of a move once the copy has landed: the removal outcome decides
/// between success and [`FmError::PartialMove`].
fn finish_move(source: &Path, target: PathBuf, removal: FmResult<()>) -> FmResult<PathBuf> {
    match removal {
        Ok(()) => Ok(target),
        Err(err) => {
            warn!(
                source = %source.display(),
                destination = %target.display(),
                error = %err,
                "move left the original in place"
            );
            Err(FmError::PartialMove {
                source_path: source.display().to_string(),
                destination: target.display().to_string(),
                reason: err.to_string(),
            })
        }
    }
}

/// True when both paths exist and resolve to the same file, through
/// symlinks or a differently spelled parent.
async fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Resolves `.` and `..` without touching the filesystem. `..` at the root stays at the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// A bare drive token such as `D:` names the root of that drive on Windows.
fn drive_root(target: &str) -> Option<PathBuf> {
    let bytes = target.as_bytes();
    let is_drive = bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    (cfg!(windows) && is_drive).then(|| PathBuf::from(format!("{target}{MAIN_SEPARATOR}")))
}

async fn is_directory(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_dir())
}

async fn metadata(path: &Path) -> FmResult<Metadata> {
    fs::metadata(path)
        .await
        .map_err(|e| FmError::from_io(&e, path))
}

async fn require_file(path: &Path) -> FmResult<()> {
    if metadata(path).await?.is_file() {
        Ok(())
    } else {
        Err(FmError::not_a_file(path))
    }
}

async fn create_exclusive(path: &Path) -> FmResult<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| FmError::from_io(&e, path))
}
