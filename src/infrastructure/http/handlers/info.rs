//! Service Info HTTP Handlers - 服务横幅与健康检查

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::application::EngineInfo;
use crate::infrastructure::http::state::AppState;

/// 服务横幅响应
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: EndpointMap,
}

/// 端点一览，方便 curl 探路
#[derive(Debug, Serialize)]
pub struct EndpointMap {
    pub health: &'static str,
    pub generate: &'static str,
    pub batch: &'static str,
    pub cache_stats: &'static str,
    pub cache_clear: &'static str,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok = 引擎可达；degraded = 引擎暂不可达（缓存命中仍可服务）
    pub status: &'static str,
    pub engine: EngineInfo,
    pub accelerated: bool,
    pub cached_items: usize,
}

/// GET / - 服务横幅
pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: "barfly",
        version: env!("CARGO_PKG_VERSION"),
        status: "online",
        endpoints: EndpointMap {
            health: "/health",
            generate: "/tts/generate",
            batch: "/tts/batch-pregenerate",
            cache_stats: "/cache/stats",
            cache_clear: "/cache/clear",
        },
    })
}

/// GET /health - 健康检查
///
/// 引擎不可达时不报错：缓存里已有的短语仍然可以播，只降级上报
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let reachable = state.engine.health_check().await;

    Json(HealthResponse {
        status: if reachable { "ok" } else { "degraded" },
        engine: state.engine.describe(),
        accelerated: state.engine.is_accelerated(),
        cached_items: state.audio_cache.len(),
    })
}
