//! Artifact GC Worker - 定期清理过期产物
//!
//! 正常情况下产物在响应发送完毕后就被删除，这里兜底处理
//! 客户端中途断开、进程崩溃等情况留下的文件和暂存目录。

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::ArtifactStorePort;
use crate::config::GcConfig;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct ArtifactGcWorkerConfig {
    /// 扫描间隔
    pub interval: Duration,
    /// 超过该时长的产物会被删除
    pub max_age: Duration,
}

impl Default for ArtifactGcWorkerConfig {
    fn default() -> Self {
        Self::from(&GcConfig::default())
    }
}

impl From<&GcConfig> for ArtifactGcWorkerConfig {
    fn from(config: &GcConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            max_age: Duration::from_secs(config.max_age_secs),
        }
    }
}

/// 产物 GC Worker
pub struct ArtifactGcWorker {
    config: ArtifactGcWorkerConfig,
    artifact_store: Arc<dyn ArtifactStorePort>,
}

impl ArtifactGcWorker {
    pub fn new(config: ArtifactGcWorkerConfig, artifact_store: Arc<dyn ArtifactStorePort>) -> Self {
        Self {
            config,
            artifact_store,
        }
    }

    /// 启动 Worker，直到所在任务被取消
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_secs = self.config.max_age.as_secs(),
            "ArtifactGcWorker started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }

    /// 执行一轮清理
    pub async fn run_once(&self) {
        match self.artifact_store.sweep(self.config.max_age).await {
            Ok(result) if result.deleted_files > 0 || result.deleted_staging_dirs > 0 => {
                tracing::info!(
                    deleted_files = result.deleted_files,
                    deleted_staging_dirs = result.deleted_staging_dirs,
                    freed_bytes = result.freed_bytes,
                    "Stale artifacts removed"
                );
            }
            Ok(_) => {
                tracing::debug!("No stale artifacts");
            }
            Err(e) => {
                tracing::error!(error = %e, "Artifact GC failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArtifactId;
    use crate::infrastructure::adapters::FileArtifactStore;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_run_once_sweeps_expired_artifacts() {
        let temp_dir = tempdir().unwrap();
        let store = Arc::new(FileArtifactStore::new(temp_dir.path()).await.unwrap());
        let id = ArtifactId::new();
        let path = store.artifact_path(&id);
        std::fs::write(&path, b"stale").unwrap();

        let worker = ArtifactGcWorker::new(
            ArtifactGcWorkerConfig {
                interval: Duration::from_secs(60),
                max_age: Duration::ZERO,
            },
            store.clone(),
        );
        worker.run_once().await;

        assert!(!path.exists());
    }

    #[test]
    fn test_config_from_gc_config() {
        let config = ArtifactGcWorkerConfig::default();
        assert_eq!(config.interval, Duration::from_secs(600));
        assert_eq!(config.max_age, Duration::from_secs(3600));
    }
}
