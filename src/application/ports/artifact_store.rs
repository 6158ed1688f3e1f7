//! Artifact Store Port - 出站端口
//!
//! 管理每个请求的暂存区、最终产物位置以及过期产物的回收

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use thiserror::Error;

use crate::domain::ArtifactId;

/// 暂存区内的音频文件名
pub const STAGED_AUDIO_NAME: &str = "audio.mp3";

/// 暂存区内的编码输出文件名
pub const STAGED_OUTPUT_NAME: &str = "output.mp4";

/// 产物存储错误
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 请求级暂存区
///
/// 独占一个临时目录，drop 时连同内容一起删除（无论成功、失败还是 panic）
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    pub fn new(dir: TempDir) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn audio_path(&self) -> PathBuf {
        self.dir.path().join(STAGED_AUDIO_NAME)
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join(STAGED_OUTPUT_NAME)
    }

    /// 写入解码后的音频
    pub async fn write_audio(&self, data: &[u8]) -> Result<PathBuf, ArtifactStoreError> {
        let audio_path = self.audio_path();
        tokio::fs::write(&audio_path, data)
            .await
            .map_err(|e| ArtifactStoreError::IoError(e.to_string()))?;
        Ok(audio_path)
    }
}

/// GC 结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcResult {
    /// 删除的产物数量
    pub deleted_files: u64,
    /// 删除的残留暂存目录数量
    pub deleted_staging_dirs: u64,
    /// 释放的空间（字节）
    pub freed_bytes: u64,
}

/// Artifact Store Port
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 产物的最终路径
    fn artifact_path(&self, id: &ArtifactId) -> PathBuf;

    /// 创建新的暂存区，与最终产物位于同一文件系统
    async fn create_staging(&self) -> Result<StagingArea, ArtifactStoreError>;

    /// 把暂存区中的文件原子地移动（rename）到最终位置
    async fn persist(
        &self,
        staged_file: &Path,
        id: &ArtifactId,
    ) -> Result<PathBuf, ArtifactStoreError>;

    /// 删除产物，不存在时视为成功
    async fn remove(&self, id: &ArtifactId) -> Result<(), ArtifactStoreError>;

    /// 清理超过 `max_age` 的产物和残留暂存目录
    async fn sweep(&self, max_age: Duration) -> Result<GcResult, ArtifactStoreError>;
}
