//! HTTP Routes
//!
//! API Endpoints:
//! - /generate   POST  图片 + base64 音频 → MP4
//! - /ping       GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/ping", get(handlers::ping))
}
