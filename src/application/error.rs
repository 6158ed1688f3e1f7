//! 应用层错误定义
//!
//! 统一的命令错误类型

use thiserror::Error;

use crate::application::ports::{ArtifactStoreError, EncoderError};
use crate::domain::GenerationError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 调用方提供的数据不可用（图片不存在、音频无法解码或为空）
    #[error("{0}")]
    InvalidInput(String),

    /// 外部编码器没有产出可用的文件
    #[error("{0}")]
    EncodingFailed(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建输入错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// 创建编码失败错误
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<GenerationError> for ApplicationError {
    fn from(err: GenerationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<EncoderError> for ApplicationError {
    fn from(err: EncoderError) -> Self {
        Self::EncodingFailed(err.to_string())
    }
}

impl From<ArtifactStoreError> for ApplicationError {
    fn from(err: ArtifactStoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}
