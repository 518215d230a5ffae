//! In-memory `WalkerFs` for tests and embedders.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;

use crate::{WalkerDirEntry, WalkerError, WalkerFs};

/// A small in-memory filesystem: a set of file paths plus a set of
/// directory paths, all slash-separated and rooted at `/`.
///
/// Adding a file creates its parent directories implicitly.
///
/// # Examples
/// ```
/// use hotglob_glob::MemoryFs;
///
/// let mut fs = MemoryFs::new();
/// fs.add_file("/src/pages/a.ts");
/// fs.add_file("/src/pages/b.ts");
/// ```
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: BTreeSet<String>,
    dirs: BTreeSet<String>,
}

/// Directory entry produced by [`MemoryFs`].
pub struct MemDirEntry {
    name: String,
    is_dir: bool,
}

impl WalkerDirEntry for MemDirEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        self.is_dir
    }

    fn is_file(&self) -> bool {
        !self.is_dir
    }
}

impl MemoryFs {
    pub fn new() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert("/".to_string());
        Self {
            files: BTreeSet::new(),
            dirs,
        }
    }

    /// Register a file, creating parent directories as needed.
    pub fn add_file(&mut self, path: &str) {
        let path = normalize(path);
        self.ensure_parents(&path);
        self.files.insert(path);
    }

    /// Register an empty directory, creating parents as needed.
    pub fn add_dir(&mut self, path: &str) {
        let path = normalize(path);
        self.ensure_parents(&path);
        self.dirs.insert(path);
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let next = format!("{}/{}", current, part);
            if next != *path {
                self.dirs.insert(next.clone());
            }
            current = next;
        }
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// The name of a direct child of `prefix`, if `path` is one.
fn direct_child<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.contains('/') {
        None
    } else {
        Some(rest)
    }
}

#[async_trait]
impl WalkerFs for MemoryFs {
    type DirEntry = MemDirEntry;

    async fn list_dir(&self, path: &Path) -> Result<Vec<MemDirEntry>, WalkerError> {
        let dir = normalize(&path.to_string_lossy());
        if !self.dirs.contains(&dir) {
            return Err(WalkerError::NotFound(dir));
        }
        let prefix = if dir == "/" { "/".to_string() } else { format!("{}/", dir) };

        let mut entries = Vec::new();
        for file in &self.files {
            if let Some(name) = direct_child(file, &prefix) {
                entries.push(MemDirEntry {
                    name: name.to_string(),
                    is_dir: false,
                });
            }
        }
        for sub in &self.dirs {
            if let Some(name) = direct_child(sub, &prefix) {
                entries.push(MemDirEntry {
                    name: name.to_string(),
                    is_dir: true,
                });
            }
        }
        Ok(entries)
    }
}
