//! Generate Command Handlers

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::application::commands::GenerateVideo;
use crate::application::error::ApplicationError;
use crate::application::ports::{ArtifactStorePort, EncodeJob, VideoEncoderPort};
use crate::domain::{ArtifactId, AudioPayload, ImageSource};

// ============================================================================
// GenerateVideo
// ============================================================================

/// 生成结果
///
/// 产物已移出暂存区，暂存区已被删除
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub artifact_id: ArtifactId,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// GenerateVideo Handler
///
/// 流程: 校验图片 → 解码音频 → 暂存 → 调用编码器 → 检查结果 → 移出暂存区
pub struct GenerateVideoHandler {
    encoder: Arc<dyn VideoEncoderPort>,
    artifact_store: Arc<dyn ArtifactStorePort>,
}

impl GenerateVideoHandler {
    pub fn new(
        encoder: Arc<dyn VideoEncoderPort>,
        artifact_store: Arc<dyn ArtifactStorePort>,
    ) -> Self {
        Self {
            encoder,
            artifact_store,
        }
    }

    pub async fn handle(&self, command: GenerateVideo) -> Result<GeneratedVideo, ApplicationError> {
        let started = Instant::now();

        // 输入校验在写任何文件之前完成
        let image = ImageSource::locate(&command.image_path).await?;
        let audio = AudioPayload::from_base64(&command.audio_content)?;

        let artifact_id = ArtifactId::new();
        let staging = self.artifact_store.create_staging().await?;
        let audio_path = staging.write_audio(audio.as_bytes()).await?;

        tracing::debug!(
            artifact_id = %artifact_id,
            image_path = %image.path().display(),
            audio_bytes = audio.byte_len(),
            staging_dir = %staging.path().display(),
            "Audio staged"
        );

        let job = EncodeJob {
            image_path: image.path().to_path_buf(),
            audio_path,
            output_path: staging.output_path(),
        };

        let output = self.encoder.encode(&job).await?;

        if !output.success() {
            return Err(ApplicationError::encoding_failed(format!(
                "{} failed\ncmd: {}\nstdout:\n{}\nstderr:\n{}\n",
                self.encoder.program_name(),
                output.command_line,
                output.stdout,
                output.stderr
            )));
        }

        if !tokio::fs::try_exists(&job.output_path).await.unwrap_or(false) {
            return Err(ApplicationError::encoding_failed(format!(
                "output not produced: mp4 was not created at {}",
                job.output_path.display()
            )));
        }

        // 必须在暂存区删除之前移走
        let path = self
            .artifact_store
            .persist(&job.output_path, &artifact_id)
            .await?;
        drop(staging);

        let size_bytes = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ApplicationError::internal(format!("Failed to stat artifact: {}", e)))?
            .len();

        tracing::info!(
            artifact_id = %artifact_id,
            image_path = %image.path().display(),
            audio_bytes = audio.byte_len(),
            size_bytes = size_bytes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Video generated"
        );

        Ok(GeneratedVideo {
            artifact_id,
            path,
            size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{tempdir, NamedTempFile, TempDir};

    use crate::application::ports::{EncodeOutput, EncoderError};
    use crate::infrastructure::adapters::FileArtifactStore;

    /// 可编排行为的编码器替身
    enum Behavior {
        /// 把音频原样写到输出路径
        CopyAudio,
        /// 退出码为 0 但不写输出
        NoOutput,
        /// 非零退出
        Fail,
    }

    struct FakeEncoder {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl FakeEncoder {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VideoEncoderPort for FakeEncoder {
        fn program_name(&self) -> String {
            "fake-ffmpeg".to_string()
        }

        async fn encode(&self, job: &EncodeJob) -> Result<EncodeOutput, EncoderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let command_line = format!(
                "fake-ffmpeg -i {} -i {} {}",
                job.image_path.display(),
                job.audio_path.display(),
                job.output_path.display()
            );

            let exit_code = match self.behavior {
                Behavior::CopyAudio => {
                    tokio::fs::copy(&job.audio_path, &job.output_path)
                        .await
                        .map_err(|e| EncoderError::IoError(e.to_string()))?;
                    0
                }
                Behavior::NoOutput => 0,
                Behavior::Fail => 1,
            };

            Ok(EncodeOutput {
                command_line,
                exit_code: Some(exit_code),
                stdout: "progress=end".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            })
        }
    }

    struct Fixture {
        output_dir: TempDir,
        image: NamedTempFile,
        encoder: Arc<FakeEncoder>,
        handler: GenerateVideoHandler,
    }

    async fn fixture(behavior: Behavior) -> Fixture {
        let output_dir = tempdir().unwrap();
        let image = NamedTempFile::new().unwrap();
        let store = Arc::new(FileArtifactStore::new(output_dir.path()).await.unwrap());
        let encoder = FakeEncoder::new(behavior);
        let handler = GenerateVideoHandler::new(encoder.clone(), store);

        Fixture {
            output_dir,
            image,
            encoder,
            handler,
        }
    }

    fn command(image: &Path, audio_content: &str) -> GenerateVideo {
        GenerateVideo {
            audio_content: audio_content.to_string(),
            image_path: image.to_string_lossy().to_string(),
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_generate_moves_artifact_out_of_staging() {
        let fx = fixture(Behavior::CopyAudio).await;

        // "ID3\x04\x00"
        let video = fx
            .handler
            .handle(command(fx.image.path(), "SUQzBAA="))
            .await
            .unwrap();

        assert_eq!(video.path.parent().unwrap(), fx.output_dir.path());
        assert_eq!(std::fs::read(&video.path).unwrap(), b"ID3\x04\x00");
        assert_eq!(video.size_bytes, 5);
        assert_eq!(fx.encoder.calls(), 1);

        // 暂存区已删除，只剩最终产物
        assert_eq!(
            dir_entries(fx.output_dir.path()),
            vec![video.artifact_id.file_name()]
        );
    }

    #[tokio::test]
    async fn test_missing_image_never_invokes_encoder() {
        let fx = fixture(Behavior::CopyAudio).await;

        let err = fx
            .handler
            .handle(command(Path::new("/no/such/avatar.png"), "SUQzBAA="))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::InvalidInput(_)));
        assert_eq!(err.to_string(), "image not found: /no/such/avatar.png");
        assert_eq!(fx.encoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_base64_writes_nothing() {
        let fx = fixture(Behavior::CopyAudio).await;

        let err = fx
            .handler
            .handle(command(fx.image.path(), "%%% not base64 %%%"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::InvalidInput(_)));
        assert!(err.to_string().starts_with("invalid audioContent base64"));
        assert_eq!(fx.encoder.calls(), 0);
        assert!(dir_entries(fx.output_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected() {
        let fx = fixture(Behavior::CopyAudio).await;

        let err = fx
            .handler
            .handle(command(fx.image.path(), ""))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::InvalidInput(_)));
        assert_eq!(err.to_string(), "audioContent is empty after base64 decode");
        assert_eq!(fx.encoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_command_and_output() {
        let fx = fixture(Behavior::Fail).await;

        let err = fx
            .handler
            .handle(command(fx.image.path(), "SUQzBAA="))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::EncodingFailed(_)));
        let detail = err.to_string();
        assert!(detail.starts_with("fake-ffmpeg failed\ncmd: fake-ffmpeg -i "));
        assert!(detail.contains("stdout:\nprogress=end\n"));
        assert!(detail.contains("stderr:\nInvalid data found when processing input\n"));

        // 失败时暂存区同样被删除
        assert!(dir_entries(fx.output_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_missing_output_is_encoding_failure() {
        let fx = fixture(Behavior::NoOutput).await;

        let err = fx
            .handler
            .handle(command(fx.image.path(), "SUQzBAA="))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::EncodingFailed(_)));
        assert!(err.to_string().starts_with("output not produced"));
        assert!(dir_entries(fx.output_dir.path()).is_empty());
    }
}
