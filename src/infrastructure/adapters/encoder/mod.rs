//! Encoder Adapters - 外部编码器实现

mod ffmpeg_encoder;
mod tool_command;

pub use ffmpeg_encoder::{FfmpegEncoder, FfmpegEncoderConfig};
pub use tool_command::{ToolCommand, ToolOutput};
