//! hotglob-glob: Glob matching and async file walking.
//!
//! Provides:
//! - **glob_match**: single-component matching with classes, braces, escapes
//! - **GlobPattern**: path-aware matching with `**` (globstar) and `!` polarity
//! - **FileWalker**: async recursive directory walker, generic over `WalkerFs`
//! - **LocalFs**: `WalkerFs` over the real filesystem (`tokio::fs`)
//! - **MemoryFs**: in-memory `WalkerFs` for tests and embedders
//!
//! The walker is generic over `WalkerFs`, a minimal read-only filesystem
//! trait. Consumers implement `WalkerFs` to adapt their own filesystem
//! abstraction.

mod glob;
mod localfs;
mod memfs;
mod pattern;
mod walker;

pub use glob::{expand_braces, glob_match, has_unescaped_special, unescape};
pub use localfs::LocalFs;
pub use memfs::MemoryFs;
pub use pattern::{GlobPattern, PatternError};
pub use walker::{FileWalker, WalkOptions, DEFAULT_EXCLUDED_DIRS};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from filesystem operations within the walker.
#[derive(Debug, Error)]
pub enum WalkerError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for WalkerError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => WalkerError::NotFound(err.to_string()),
            ErrorKind::PermissionDenied => WalkerError::PermissionDenied(err.to_string()),
            _ => WalkerError::Io(err.to_string()),
        }
    }
}

/// Minimal read-only filesystem abstraction for the walker.
///
/// Implement this trait to adapt your project's filesystem layer to
/// [`FileWalker`].
#[async_trait]
pub trait WalkerFs: Send + Sync {
    /// The directory entry type returned by `list_dir`.
    type DirEntry: WalkerDirEntry;

    /// List the entries in a directory.
    async fn list_dir(&self, path: &Path) -> Result<Vec<Self::DirEntry>, WalkerError>;
}

/// A single entry returned by [`WalkerFs::list_dir`].
pub trait WalkerDirEntry: Send {
    /// The entry name (file or directory name, not full path).
    fn name(&self) -> &str;

    /// True if this entry is a directory.
    fn is_dir(&self) -> bool;

    /// True if this entry is a regular file.
    fn is_file(&self) -> bool;
}
