//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "AVATAR_VIDEO";

/// 加载应用配置
///
/// # 环境变量示例
/// - `AVATAR_VIDEO_SERVER__PORT=8080`
/// - `AVATAR_VIDEO_ENCODER__PROGRAM=/usr/local/bin/ffmpeg`
/// - `AVATAR_VIDEO_ENCODER__TIMEOUT_SECS=120`
/// - `AVATAR_VIDEO_STORAGE__OUTPUT_DIR=/tmp/avatar-video`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.max_body_bytes", 50_u64 * 1024 * 1024)?
        .set_default("encoder.program", "ffmpeg")?
        .set_default("encoder.video_codec", "libx264")?
        .set_default("encoder.audio_codec", "aac")?
        .set_default("encoder.audio_bitrate", "192k")?
        .set_default("encoder.frame_rate", 30)?
        .set_default("encoder.timeout_secs", 300)?
        .set_default("storage.output_dir", "data/output")?
        .set_default("storage.default_image_path", "/assets/avatar.png")?
        .set_default("gc.enabled", true)?
        .set_default("gc.interval_secs", 600)?
        .set_default("gc.max_age_secs", 3600)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: AVATAR_VIDEO_ENCODER__PROGRAM=/opt/ffmpeg/bin/ffmpeg
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.encoder.program.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Encoder program cannot be empty".to_string(),
        ));
    }

    if config.encoder.video_codec.is_empty() || config.encoder.audio_codec.is_empty() {
        return Err(ConfigError::ValidationError(
            "Encoder codecs cannot be empty".to_string(),
        ));
    }

    if config.encoder.frame_rate == 0 {
        return Err(ConfigError::ValidationError(
            "Encoder frame rate cannot be 0".to_string(),
        ));
    }

    if config.storage.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Output directory cannot be empty".to_string(),
        ));
    }

    if config.gc.enabled {
        if config.gc.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "GC interval cannot be 0 when GC is enabled".to_string(),
            ));
        }

        if config.gc.max_age_secs == 0 {
            return Err(ConfigError::ValidationError(
                "GC max age cannot be 0 when GC is enabled".to_string(),
            ));
        }

        // 暂存目录在编码期间存活，GC 不能早于编码超时把它判为过期
        if config.encoder.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Encoder timeout cannot be disabled when GC is enabled".to_string(),
            ));
        }

        if config.gc.max_age_secs <= config.encoder.timeout_secs {
            return Err(ConfigError::ValidationError(format!(
                "GC max age ({}s) must exceed encoder timeout ({}s)",
                config.gc.max_age_secs, config.encoder.timeout_secs
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Max Body: {} bytes", config.server.max_body_bytes);
    tracing::info!("Encoder: {}", config.encoder.program.display());
    tracing::info!(
        "Encoder Codecs: video={}, audio={} @ {}, {} fps",
        config.encoder.video_codec,
        config.encoder.audio_codec,
        config.encoder.audio_bitrate,
        config.encoder.frame_rate
    );
    match config.encoder.timeout() {
        Some(timeout) => tracing::info!("Encoder Timeout: {}s", timeout.as_secs()),
        None => tracing::info!("Encoder Timeout: disabled"),
    }
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Default Image: {}", config.storage.default_image_path);
    tracing::info!("GC Enabled: {}", config.gc.enabled);
    if config.gc.enabled {
        tracing::info!("GC Interval: {}s", config.gc.interval_secs);
        tracing::info!("Artifact Max Age: {}s", config.gc.max_age_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
