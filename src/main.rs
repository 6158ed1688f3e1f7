//! Avatar Video - 静态图片 + 音频合成 MP4 服务

use std::sync::Arc;

use avatar_video::config::{load_config, print_config, LogConfig};
use avatar_video::infrastructure::http::{AppState, HttpServer, ServerConfig};
use avatar_video::infrastructure::{
    ArtifactGcWorker, ArtifactGcWorkerConfig, FfmpegEncoder, FfmpegEncoderConfig,
    FileArtifactStore,
};

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},avatar_video={},tower_http=debug", log.level, log.level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Avatar Video - image + audio to MP4");
    print_config(&config);

    let artifact_store = Arc::new(FileArtifactStore::new(&config.storage.output_dir).await?);
    let encoder = Arc::new(FfmpegEncoder::new(FfmpegEncoderConfig::from(&config.encoder)));

    // 启动 GC Worker
    if config.gc.enabled {
        let worker = ArtifactGcWorker::new(
            ArtifactGcWorkerConfig::from(&config.gc),
            artifact_store.clone(),
        );
        tokio::spawn(worker.run());
    }

    let state = AppState::new(
        encoder,
        artifact_store,
        config.storage.default_image_path.clone(),
    );
    let server = HttpServer::new(ServerConfig::from(&config.server), state);

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
