//! HTTP Routes - 路由定义

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::infrastructure::http::handlers;
use crate::infrastructure::http::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        .nest("/tts", tts_routes())
        .nest("/cache", cache_routes())
}

/// 语音合成相关路由
fn tts_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/batch-pregenerate", post(handlers::batch_pregenerate))
}

/// 缓存管理相关路由
fn cache_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(handlers::cache_stats))
        .route("/clear", delete(handlers::clear_cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::domain::DrunkPersona;
    use crate::infrastructure::adapters::{FakeEngine, FakeEngineConfig};
    use crate::infrastructure::persistence::sled::SledAudioCache;

    /// 真缓存（临时 sled 目录）+ Fake 引擎装配出完整路由。
    /// TempDir 必须随 Router 一起存活，析构即删库
    fn test_app() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = SledAudioCache::open(dir.path().join("audio.sled"))
            .unwrap()
            .arc();
        let engine = Arc::new(FakeEngine::new(FakeEngineConfig {
            latency_ms: 0,
            ..Default::default()
        }));
        let state = AppState::new(
            cache,
            engine,
            Arc::new(DrunkPersona::new()),
            0.95,
            Duration::from_secs(5),
        )
        .arc();

        (create_routes().with_state(state), dir)
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_service_banner_lists_endpoints() {
        let (app, _dir) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["service"], "barfly");
        assert_eq!(body["status"], "online");
        assert_eq!(body["endpoints"]["generate"], "/tts/generate");
    }

    #[tokio::test]
    async fn test_health_reports_engine_and_cache() {
        let (app, _dir) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["engine"]["engine"], "fake");
        assert_eq!(body["accelerated"], false);
        assert_eq!(body["cached_items"], 0);
    }

    #[tokio::test]
    async fn test_generate_returns_wav_and_cache_header() {
        let (app, _dir) = test_app();

        let miss = app
            .clone()
            .oneshot(json_post(
                "/tts/generate",
                serde_json::json!({"text": "One hundred and eighty!"}),
            ))
            .await
            .unwrap();
        assert_eq!(miss.status(), StatusCode::OK);
        assert_eq!(miss.headers()[header::CONTENT_TYPE], "audio/wav");
        assert_eq!(miss.headers()["x-cache"], "MISS");
        let audio = axum::body::to_bytes(miss.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&audio[0..4], b"RIFF");

        // 第二次请求同一原文命中缓存
        let hit = app
            .oneshot(json_post(
                "/tts/generate",
                serde_json::json!({"text": "One hundred and eighty!"}),
            ))
            .await
            .unwrap();
        assert_eq!(hit.status(), StatusCode::OK);
        assert_eq!(hit.headers()["x-cache"], "HIT");
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_text() {
        let (app, _dir) = test_app();

        let response = app
            .oneshot(json_post(
                "/tts/generate",
                serde_json::json!({"text": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"], "Text cannot be empty");
    }

    #[tokio::test]
    async fn test_generate_rejects_unknown_quality() {
        let (app, _dir) = test_app();

        // quality 是固定枚举，未知值在反序列化阶段拒绝
        let response = app
            .oneshot(json_post(
                "/tts/generate",
                serde_json::json!({"text": "Nice!", "quality": "legendary"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_batch_stats_clear_roundtrip() {
        let (app, _dir) = test_app();

        let response = app
            .clone()
            .oneshot(json_post(
                "/tts/batch-pregenerate",
                serde_json::json!([
                    {"text": "Nice throw!", "quality": "great"},
                    {"text": "Unlucky, mate.", "quality": "miss"},
                ]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "complete");
        assert_eq!(body["results"][0]["status"], "generated");
        assert_eq!(body["results"][1]["status"], "generated");
        assert_eq!(body["total_cached"], 2);

        // 统计反映预热结果
        let stats = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let stats_body = json_body(stats).await;
        assert_eq!(stats_body["total_items"], 2);

        // 清空后归零
        let cleared = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/cache/clear")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let cleared_body = json_body(cleared).await;
        assert_eq!(cleared_body["status"], "success");
        assert_eq!(cleared_body["items_removed"], 2);

        let stats = app
            .oneshot(
                Request::builder()
                    .uri("/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(stats).await["total_items"], 0);
    }
}
