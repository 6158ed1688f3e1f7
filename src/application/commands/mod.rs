//! 应用层 - 命令
//!
//! 服务唯一的写操作：图片 + 音频 → MP4

mod generate_commands;

pub mod handlers;

pub use generate_commands::*;
