//! Tool Command - 带超时的外部进程执行器

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::application::ports::EncoderError;

/// 进程执行结果
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// 退出码，被信号终止时为 None
    pub exit_code: Option<i32>,
    /// 标准输出（lossy UTF-8）
    pub stdout: String,
    /// 标准错误（lossy UTF-8）
    pub stderr: String,
}

/// 外部工具调用构建器
///
/// 与 `std::process::Command` 不同，非零退出不视为错误，
/// 由调用方根据 [`ToolOutput::exit_code`] 决定如何处理
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// 追加单个参数
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// 追加多个参数
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// 设置最长执行时间，None 表示一直等待
    pub fn timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// 程序名（不含目录）
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// 完整命令行，参数以空格连接
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 执行并捕获 stdout/stderr
    ///
    /// 超时后子进程会被 kill（`kill_on_drop`）
    pub async fn execute(&self) -> Result<ToolOutput, EncoderError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| EncoderError::Spawn {
            program: self.program_name(),
            message: e.to_string(),
        })?;

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_elapsed| EncoderError::Timeout {
                    program: self.program_name(),
                    timeout,
                    command_line: self.command_line(),
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| EncoderError::IoError(format!("waiting for {}: {}", self.program_name(), e)))?;

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
