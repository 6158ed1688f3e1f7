//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Generation Context: 图片 + 音频合成视频的输入与产物标识

pub mod generation;

pub use generation::{ArtifactId, AudioPayload, GenerationError, ImageSource};
