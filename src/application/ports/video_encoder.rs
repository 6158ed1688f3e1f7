//! Video Encoder Port - 外部编码器抽象
//!
//! 把一张静态图片和一段音频合成为 MP4。具体实现通过子进程调用外部工具，
//! 应用层只关心退出状态、stdout、stderr 以及输出文件是否存在。

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 编码器调用错误（未拿到退出状态的情况）
#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} timed out after {timeout:?}\ncmd: {command_line}")]
    Timeout {
        program: String,
        timeout: Duration,
        command_line: String,
    },

    #[error("IO error: {0}")]
    IoError(String),
}

/// 一次编码任务
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// 循环播放的静态图片
    pub image_path: PathBuf,
    /// 音频文件
    pub audio_path: PathBuf,
    /// 输出文件（已存在则覆盖）
    pub output_path: PathBuf,
}

/// 编码器进程的执行结果
#[derive(Debug, Clone)]
pub struct EncodeOutput {
    /// 完整命令行（参数以空格连接）
    pub command_line: String,
    /// 退出码，被信号终止时为 None
    pub exit_code: Option<i32>,
    /// 捕获的标准输出
    pub stdout: String,
    /// 捕获的标准错误
    pub stderr: String,
}

impl EncodeOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Video Encoder Port
#[async_trait]
pub trait VideoEncoderPort: Send + Sync {
    /// 编码器名称，用于错误信息
    fn program_name(&self) -> String;

    /// 执行编码并等待进程退出
    ///
    /// 非零退出不是 Err：调用方根据 [`EncodeOutput`] 自行判定
    async fn encode(&self, job: &EncodeJob) -> Result<EncodeOutput, EncoderError>;
}
