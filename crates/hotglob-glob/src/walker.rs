//! Async file walker, generic over [`WalkerFs`].
//!
//! Deterministic recursive traversal: entries are visited in name order,
//! hidden entries are skipped unless asked for, and excluded directory
//! names (dependency trees like `node_modules`) are never descended into.
//! Only regular files are yielded — a directory matching a pattern does
//! not implicitly contribute its contents.

use std::path::{Path, PathBuf};

use crate::{WalkerDirEntry, WalkerFs};

/// Directory names that are never descended into by default.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules"];

/// Options for file walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
    /// Include hidden entries (names starting with `.`).
    pub include_hidden: bool,
    /// Directory names to skip entirely, at any depth.
    pub excluded_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_hidden: false,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Async file walker.
///
/// Unreadable directories are skipped rather than aborting the walk.
///
/// # Examples
/// ```ignore
/// use hotglob_glob::{FileWalker, WalkOptions};
///
/// let files = FileWalker::new(&fs, "/src")
///     .with_options(WalkOptions::default())
///     .collect()
///     .await;
/// ```
pub struct FileWalker<'a, F: WalkerFs> {
    fs: &'a F,
    root: PathBuf,
    options: WalkOptions,
}

impl<'a, F: WalkerFs> FileWalker<'a, F> {
    /// Create a walker rooted at the given directory.
    pub fn new(fs: &'a F, root: impl AsRef<Path>) -> Self {
        Self {
            fs,
            root: root.as_ref().to_path_buf(),
            options: WalkOptions::default(),
        }
    }

    /// Set walk options.
    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    /// Collect all file paths under the root, in deterministic order.
    pub async fn collect(self) -> Vec<PathBuf> {
        let mut results = Vec::new();
        let mut stack = vec![(self.root.clone(), 0usize)];

        while let Some((dir, depth)) = stack.pop() {
            if let Some(max) = self.options.max_depth {
                if depth > max {
                    continue;
                }
            }

            let entries = match self.fs.list_dir(&dir).await {
                Ok(entries) => entries,
                // Unreadable directory: skip it, keep walking.
                Err(_) => continue,
            };

            let mut entries: Vec<_> = entries
                .into_iter()
                .map(|e| (e.name().to_string(), e.is_dir(), e.is_file()))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            // Push directories in reverse so alphabetically-first dirs pop
            // first from the LIFO stack.
            let mut dirs_to_push = Vec::new();

            for (name, is_dir, is_file) in entries {
                if !self.options.include_hidden && name.starts_with('.') {
                    continue;
                }

                let full_path = dir.join(&name);
                if is_dir {
                    if self.options.excluded_dirs.iter().any(|d| d == &name) {
                        continue;
                    }
                    dirs_to_push.push((full_path, depth + 1));
                } else if is_file {
                    results.push(full_path);
                }
            }

            dirs_to_push.reverse();
            stack.extend(dirs_to_push);
        }

        results
    }
}
