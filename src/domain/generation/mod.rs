//! Generation Context - 视频合成限界上下文
//!
//! 职责:
//! - 校验调用方提供的图片路径与 base64 音频
//! - 为每个请求生成唯一的产物标识

mod errors;
mod value_objects;

pub use errors::GenerationError;
pub use value_objects::{ArtifactId, AudioPayload, ImageSource, ARTIFACT_EXTENSION, ARTIFACT_PREFIX};
