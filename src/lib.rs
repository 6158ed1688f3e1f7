//! Avatar Video - 静态图片 + 音频合成 MP4 服务
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Generation Context: 图片来源、音频负载、产物标识
//!
//! 应用层 (application/):
//! - Ports: VideoEncoder, ArtifactStore
//! - Commands: GenerateVideo 命令处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: `POST /generate`
//! - Adapters: ffmpeg 子进程编码器、文件系统产物存储
//! - Worker: 过期产物 GC

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
