use crate::domain::ports::Storage;
use crate::utils::error::{ClassifyError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 本機檔案系統
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            // metadata 會跟隨符號連結
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::debug!("Skipping unreadable entry {}: {}", path.display(), e),
            }
        }

        files.sort();
        Ok(files)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir(path).await?;
        Ok(())
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        // hard_link 不會覆蓋既有檔案，存在檢查與搬移是同一個動作
        match fs::hard_link(from, to).await {
            Ok(()) => {
                fs::remove_file(from).await?;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(ClassifyError::DestinationExists {
                path: to.to_path_buf(),
            }),
            Err(e) => {
                // 檔案系統不支援硬連結時退回 rename
                tracing::debug!("hard_link {} failed ({}), falling back to rename", to.display(), e);
                if fs::try_exists(to).await? {
                    return Err(ClassifyError::DestinationExists {
                        path: to.to_path_buf(),
                    });
                }
                fs::rename(from, to).await?;
                Ok(())
            }
        }
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, data).await?;
        Ok(())
    }
}
