//! Cache HTTP Handlers - 缓存统计与清空

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::application::{ClearCache, GetCacheStats};
use crate::infrastructure::http::state::AppState;

/// 缓存统计响应
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub total_items: usize,
    pub cache_dir: String,
}

/// 清空缓存响应
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub status: &'static str,
    pub items_removed: usize,
}

/// GET /cache/stats - 缓存统计
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    let view = state.cache_stats_handler.handle(GetCacheStats);

    Json(CacheStatsResponse {
        total_items: view.total_items,
        cache_dir: view.cache_dir.display().to_string(),
    })
}

/// DELETE /cache/clear - 清空两级缓存
///
/// 个别持久记录删除失败只计入日志，不中断整体清空
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ClearCacheResponse> {
    let cleared = state.clear_cache_handler.handle(ClearCache);

    Json(ClearCacheResponse {
        status: "success",
        items_removed: cleared.removed,
    })
}
