//! Generate Handler
//!
//! `POST /generate`：返回 MP4 文件，响应体发送完毕（或客户端断开）后删除产物

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures_util::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio_util::io::ReaderStream;

use crate::application::{ArtifactStorePort, GenerateVideo};
use crate::domain::ArtifactId;
use crate::infrastructure::http::dto::GenerateRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 下载时建议的文件名
const DOWNLOAD_FILE_NAME: &str = "output.mp4";

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Response, ApiError> {
    let command = GenerateVideo {
        audio_content: req.audio_content,
        image_path: req
            .image_path
            .unwrap_or_else(|| state.default_image_path.clone()),
    };

    let video = state.generate_video_handler.handle(command).await?;
    let guard = ArtifactGuard::new(video.artifact_id, state.artifact_store.clone());

    let file = tokio::fs::File::open(&video.path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open artifact: {}", e)))?;

    let body = Body::from_stream(GuardedStream {
        inner: ReaderStream::new(file),
        _guard: guard,
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, video.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// 产物生命周期守卫，drop 时删除产物文件
struct ArtifactGuard {
    id: ArtifactId,
    store: Arc<dyn ArtifactStorePort>,
}

impl ArtifactGuard {
    fn new(id: ArtifactId, store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { id, store }
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        let id = self.id;
        let store = self.store.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = store.remove(&id).await {
                        tracing::warn!(artifact_id = %id, error = %e, "Failed to remove artifact");
                    }
                });
            }
            // 没有运行时时交给 GC
            Err(_) => {
                tracing::warn!(artifact_id = %id, "No runtime to remove artifact, leaving it to GC");
            }
        }
    }
}

/// 持有 [`ArtifactGuard`] 的响应体流
struct GuardedStream<S> {
    inner: S,
    _guard: ArtifactGuard,
}

impl<S> Stream for GuardedStream<S>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
