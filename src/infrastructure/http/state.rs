//! Application State

use std::sync::Arc;

use crate::application::{ArtifactStorePort, GenerateVideoHandler, VideoEncoderPort};

/// 应用状态
///
/// 请求之间不共享可变状态，只共享无状态的端口实现
pub struct AppState {
    // ========== Ports ==========
    pub artifact_store: Arc<dyn ArtifactStorePort>,

    // ========== Command Handlers ==========
    pub generate_video_handler: GenerateVideoHandler,

    /// 请求未提供 imagePath 时使用
    pub default_image_path: String,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        encoder: Arc<dyn VideoEncoderPort>,
        artifact_store: Arc<dyn ArtifactStorePort>,
        default_image_path: impl Into<String>,
    ) -> Self {
        Self {
            artifact_store: artifact_store.clone(),
            generate_video_handler: GenerateVideoHandler::new(encoder, artifact_store),
            default_image_path: default_image_path.into(),
        }
    }
}
