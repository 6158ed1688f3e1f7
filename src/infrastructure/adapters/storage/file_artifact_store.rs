//! File Artifact Store - 文件系统产物存储实现
//!
//! 实现 ArtifactStorePort trait。暂存目录建在产物目录之下，
//! 保证 persist 的 rename 不会跨文件系统。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;

use crate::application::ports::{ArtifactStoreError, ArtifactStorePort, GcResult, StagingArea};
use crate::domain::generation::{ArtifactId, ARTIFACT_EXTENSION, ARTIFACT_PREFIX};

/// 暂存目录前缀
const STAGING_PREFIX: &str = ".staging-";

/// 文件系统产物存储
pub struct FileArtifactStore {
    /// 产物根目录
    base_dir: PathBuf,
}

impl FileArtifactStore {
    /// 创建新的产物存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, ArtifactStoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ArtifactStoreError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }
}

/// GC 关心的目录项
enum SweepKind {
    Artifact,
    Staging,
}

fn classify(name: &str, is_dir: bool) -> Option<SweepKind> {
    if is_dir && name.starts_with(STAGING_PREFIX) {
        return Some(SweepKind::Staging);
    }
    let is_artifact = name.starts_with(ARTIFACT_PREFIX)
        && Path::new(name).extension().map_or(false, |ext| ext == ARTIFACT_EXTENSION);
    if !is_dir && is_artifact {
        return Some(SweepKind::Artifact);
    }
    None
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    fn artifact_path(&self, id: &ArtifactId) -> PathBuf {
        self.base_dir.join(id.file_name())
    }

    async fn create_staging(&self) -> Result<StagingArea, ArtifactStoreError> {
        // tempfile 只有同步接口
        let base_dir = self.base_dir.clone();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(STAGING_PREFIX)
                .tempdir_in(&base_dir)
        })
        .await
        .map_err(|e| ArtifactStoreError::IoError(format!("staging task failed: {}", e)))?
        .map_err(|e| ArtifactStoreError::IoError(e.to_string()))?;

        Ok(StagingArea::new(dir))
    }

    async fn persist(
        &self,
        staged_file: &Path,
        id: &ArtifactId,
    ) -> Result<PathBuf, ArtifactStoreError> {
        if !fs::try_exists(staged_file).await.unwrap_or(false) {
            return Err(ArtifactStoreError::FileNotFound(
                staged_file.to_string_lossy().to_string(),
            ));
        }

        let artifact_path = self.artifact_path(id);
        fs::rename(staged_file, &artifact_path)
            .await
            .map_err(|e| ArtifactStoreError::IoError(e.to_string()))?;

        tracing::debug!(
            artifact_id = %id,
            path = %artifact_path.display(),
            "Artifact persisted"
        );

        Ok(artifact_path)
    }

    async fn remove(&self, id: &ArtifactId) -> Result<(), ArtifactStoreError> {
        match fs::remove_file(self.artifact_path(id)).await {
            Ok(()) => {
                tracing::debug!(artifact_id = %id, "Artifact removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArtifactStoreError::IoError(e.to_string())),
        }
    }

    async fn sweep(&self, max_age: Duration) -> Result<GcResult, ArtifactStoreError> {
        let mut result = GcResult::default();
        let now = SystemTime::now();

        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| ArtifactStoreError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ArtifactStoreError::IoError(e.to_string()))?
        {
            // 与正在进行的请求竞争时，条目可能已经消失
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(kind) = classify(&name, metadata.is_dir()) else {
                continue;
            };

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age < max_age {
                continue;
            }

            let path = entry.path();
            let removed = match kind {
                SweepKind::Artifact => fs::remove_file(&path).await,
                SweepKind::Staging => fs::remove_dir_all(&path).await,
            };

            match removed {
                Ok(()) => match kind {
                    SweepKind::Artifact => {
                        result.deleted_files += 1;
                        result.freed_bytes += metadata.len();
                    }
                    SweepKind::Staging => result.deleted_staging_dirs += 1,
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale entry");
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_staging_lives_under_base_dir_and_is_removed_on_drop() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let staging = store.create_staging().await.unwrap();
        let staging_path = staging.path().to_path_buf();
        assert_eq!(staging_path.parent().unwrap(), temp_dir.path());

        let audio_path = staging.write_audio(b"fake mp3").await.unwrap();
        assert_eq!(std::fs::read(&audio_path).unwrap(), b"fake mp3");

        drop(staging);
        assert!(!staging_path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_staging_areas_are_distinct() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let (a, b) = tokio::join!(store.create_staging(), store.create_staging());
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
        assert!(b.path().is_dir());
    }

    #[tokio::test]
    async fn test_create_staging_reports_missing_base_dir() {
        let temp_dir = tempdir().unwrap();
        let base_dir = temp_dir.path().join("output");
        let store = FileArtifactStore::new(&base_dir).await.unwrap();
        std::fs::remove_dir(&base_dir).unwrap();

        let result = store.create_staging().await;
        assert!(matches!(result, Err(ArtifactStoreError::IoError(_))));
    }

    #[tokio::test]
    async fn test_persist_renames_out_of_staging() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();
        let id = ArtifactId::new();

        let staging = store.create_staging().await.unwrap();
        let output = staging.output_path();
        std::fs::write(&output, b"fake mp4").unwrap();

        let path = store.persist(&output, &id).await.unwrap();
        assert_eq!(path, store.artifact_path(&id));
        assert!(!output.exists());

        drop(staging);
        assert_eq!(std::fs::read(&path).unwrap(), b"fake mp4");

        store.remove(&id).await.unwrap();
        assert!(!path.exists());
        // 重复删除不报错
        store.remove(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_persist_missing_file() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let result = store
            .persist(&temp_dir.path().join("missing.mp4"), &ArtifactId::new())
            .await;
        assert!(matches!(result, Err(ArtifactStoreError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_sweep_removes_only_stale_artifacts() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let id = ArtifactId::new();
        std::fs::write(store.artifact_path(&id), b"12345").unwrap();
        let leftover = temp_dir.path().join(".staging-abc123");
        std::fs::create_dir(&leftover).unwrap();
        std::fs::write(leftover.join("audio.mp3"), b"x").unwrap();
        let unrelated = temp_dir.path().join("notes.txt");
        std::fs::write(&unrelated, b"keep me").unwrap();

        // 未过期：什么都不删
        let result = store.sweep(Duration::from_secs(3600)).await.unwrap();
        assert_eq!(result, GcResult::default());
        assert!(store.artifact_path(&id).exists());

        // max_age 为 0：所有产物和残留暂存目录都过期
        let result = store.sweep(Duration::ZERO).await.unwrap();
        assert_eq!(result.deleted_files, 1);
        assert_eq!(result.deleted_staging_dirs, 1);
        assert_eq!(result.freed_bytes, 5);
        assert!(!store.artifact_path(&id).exists());
        assert!(!leftover.exists());
        assert!(unrelated.exists());
    }
}
