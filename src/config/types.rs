//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 外部编码器配置
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// GC 配置
    #[serde(default)]
    pub gc: GcConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体最大字节数（base64 音频会放大约 4/3）
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024 // 50 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// 外部编码器（ffmpeg）配置
#[derive(Debug, Clone, Deserialize)]
pub struct EncoderConfig {
    /// 可执行文件路径或名称
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// 视频编码器（h264 系列）
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// 音频编码器
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// 音频比特率，例如 "192k"
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// 输出帧率
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// 编码超时时间（秒），0 表示不限制
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_program() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_frame_rate() -> u32 {
    30
}

fn default_timeout_secs() -> u64 {
    300 // 5 分钟
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            frame_rate: default_frame_rate(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EncoderConfig {
    /// 编码超时，`timeout_secs == 0` 时返回 None
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 最终产物目录，暂存目录也创建在此目录下
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 请求未指定 imagePath 时使用的图片
    #[serde(default = "default_image_path")]
    pub default_image_path: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/output")
}

fn default_image_path() -> String {
    "/assets/avatar.png".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_image_path: default_image_path(),
        }
    }
}

/// GC（垃圾回收）配置
#[derive(Debug, Clone, Deserialize)]
pub struct GcConfig {
    /// 是否启用自动 GC
    #[serde(default = "default_gc_enabled")]
    pub enabled: bool,

    /// GC 间隔时间（秒）
    #[serde(default = "default_gc_interval")]
    pub interval_secs: u64,

    /// 产物最长保留时间（秒）
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

fn default_gc_enabled() -> bool {
    true
}

fn default_gc_interval() -> u64 {
    600 // 10 分钟
}

fn default_max_age() -> u64 {
    3600 // 1 小时
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: default_gc_enabled(),
            interval_secs: default_gc_interval(),
            max_age_secs: default_max_age(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
