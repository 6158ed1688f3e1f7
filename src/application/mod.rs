//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（VideoEncoder、ArtifactStore）
//! - commands: 生成视频命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{GenerateVideoHandler, GeneratedVideo},
    GenerateVideo,
};

pub use error::ApplicationError;

pub use ports::{
    // Artifact store
    ArtifactStoreError,
    ArtifactStorePort,
    GcResult,
    StagingArea,
    // Video encoder
    EncodeJob,
    EncodeOutput,
    EncoderError,
    VideoEncoderPort,
};
