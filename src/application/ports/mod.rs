//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod video_encoder;

pub use artifact_store::{
    ArtifactStoreError, ArtifactStorePort, GcResult, StagingArea, STAGED_AUDIO_NAME,
    STAGED_OUTPUT_NAME,
};
pub use video_encoder::{EncodeJob, EncodeOutput, EncoderError, VideoEncoderPort};
