//! Real-filesystem `WalkerFs` implementation over `tokio::fs`.

use std::path::Path;

use async_trait::async_trait;

use crate::{WalkerDirEntry, WalkerError, WalkerFs};

/// `WalkerFs` backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

/// Directory entry read from the local filesystem.
pub struct LocalDirEntry {
    name: String,
    is_dir: bool,
    is_file: bool,
}

impl WalkerDirEntry for LocalDirEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        self.is_dir
    }

    fn is_file(&self) -> bool {
        self.is_file
    }
}

#[async_trait]
impl WalkerFs for LocalFs {
    type DirEntry = LocalDirEntry;

    async fn list_dir(&self, path: &Path) -> Result<Vec<LocalDirEntry>, WalkerError> {
        let mut read_dir = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let file_type = entry.file_type().await?;
            entries.push(LocalDirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
                is_file: file_type.is_file(),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_real_directory() {
        let dir = std::env::temp_dir().join(format!("hotglob-localfs-{}", std::process::id()));
        tokio::fs::create_dir_all(dir.join("sub")).await.unwrap();
        tokio::fs::write(dir.join("file.txt"), b"x").await.unwrap();

        let entries = LocalFs.list_dir(&dir).await.unwrap();
        assert!(entries.iter().any(|e| e.name() == "file.txt" && e.is_file()));
        assert!(entries.iter().any(|e| e.name() == "sub" && e.is_dir()));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_directory_errors() {
        let result = LocalFs.list_dir(Path::new("/definitely/not/here")).await;
        assert!(matches!(result, Err(WalkerError::NotFound(_))));
    }
}
