//! FFmpeg Encoder - 通过子进程调用 ffmpeg 合成视频
//!
//! 参数固定为：静态图片无限循环 + 音频，libx264 / yuv420p / 30fps，
//! aac 192k，以较短的流截断，并覆盖已存在的输出文件

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use super::tool_command::ToolCommand;
use crate::application::ports::{EncodeJob, EncodeOutput, EncoderError, VideoEncoderPort};
use crate::config::EncoderConfig;

/// FFmpeg 编码器配置
#[derive(Debug, Clone)]
pub struct FfmpegEncoderConfig {
    pub program: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub frame_rate: u32,
    pub timeout: Option<Duration>,
}

impl Default for FfmpegEncoderConfig {
    fn default() -> Self {
        Self::from(&EncoderConfig::default())
    }
}

impl From<&EncoderConfig> for FfmpegEncoderConfig {
    fn from(config: &EncoderConfig) -> Self {
        Self {
            program: config.program.clone(),
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
            audio_bitrate: config.audio_bitrate.clone(),
            frame_rate: config.frame_rate,
            timeout: config.timeout(),
        }
    }
}

/// FFmpeg 编码器
pub struct FfmpegEncoder {
    config: FfmpegEncoderConfig,
}

impl FfmpegEncoder {
    pub fn new(config: FfmpegEncoderConfig) -> Self {
        tracing::info!(
            program = %config.program.display(),
            video_codec = %config.video_codec,
            audio_codec = %config.audio_codec,
            "FfmpegEncoder initialized"
        );
        Self { config }
    }

    /// 构建一次编码的完整命令
    pub fn build_command(&self, job: &EncodeJob) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.config.program);
        cmd.arg("-y")
            .args(["-loop", "1"])
            .arg("-i")
            .arg(job.image_path.to_string_lossy())
            .arg("-i")
            .arg(job.audio_path.to_string_lossy())
            .arg("-c:v")
            .arg(&self.config.video_codec)
            .args(["-pix_fmt", "yuv420p"])
            .arg("-r")
            .arg(self.config.frame_rate.to_string())
            .arg("-c:a")
            .arg(&self.config.audio_codec)
            .arg("-b:a")
            .arg(&self.config.audio_bitrate)
            .arg("-shortest")
            .arg(job.output_path.to_string_lossy())
            .timeout(self.config.timeout);
        cmd
    }
}

#[async_trait]
impl VideoEncoderPort for FfmpegEncoder {
    fn program_name(&self) -> String {
        ToolCommand::new(&self.config.program).program_name()
    }

    async fn encode(&self, job: &EncodeJob) -> Result<EncodeOutput, EncoderError> {
        let cmd = self.build_command(job);
        let command_line = cmd.command_line();

        tracing::debug!(cmd = %command_line, "Running encoder");

        let output = cmd.execute().await?;

        if output.exit_code != Some(0) {
            tracing::warn!(
                exit_code = ?output.exit_code,
                stderr_tail = %stderr_tail(&output.stderr),
                "Encoder exited with failure"
            );
        }

        Ok(EncodeOutput {
            command_line,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// stderr 最后一行非空内容，ffmpeg 通常把原因写在这里
fn stderr_tail(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
}
