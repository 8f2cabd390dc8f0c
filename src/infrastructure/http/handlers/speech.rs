//! Speech HTTP Handlers - 解说音频生成与批量预热

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::{GenerateCommentary, PregenerateBatch, PregenerateItem};
use crate::domain::ThrowQuality;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

fn default_use_persona() -> bool {
    true
}

/// 生成请求
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    #[serde(default)]
    pub quality: Option<ThrowQuality>,
    #[serde(default = "default_use_persona")]
    pub use_persona: bool,
}

/// 批量预热条目（请求体是裸数组：`[{"text": ..., "quality": ...}, ...]`）
#[derive(Debug, Deserialize)]
pub struct BatchItem {
    pub text: String,
    #[serde(default)]
    pub quality: Option<ThrowQuality>,
}

/// 批量预热单条结果
#[derive(Debug, Serialize)]
pub struct BatchItemResult {
    pub text: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 批量预热响应
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub status: &'static str,
    pub results: Vec<BatchItemResult>,
    pub total_cached: usize,
}

/// POST /tts/generate - 生成单条解说音频
///
/// 响应体直接是 WAV 字节，`X-Cache` 头区分命中来源（HIT / MISS）
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Response, ApiError> {
    let generated = state
        .generate_handler
        .handle(GenerateCommentary {
            text: req.text,
            quality: req.quality,
            use_persona: req.use_persona,
        })
        .await?;

    let cache_state = if generated.cache_hit { "HIT" } else { "MISS" };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, generated.audio.len())
        .header("X-Cache", cache_state)
        .body(Body::from(generated.audio))
        .unwrap())
}

/// POST /tts/batch-pregenerate - 批量预热缓存
///
/// 单条失败不影响其余条目，整体始终回 200，失败条目在 results 里
/// 逐条标注。游戏开场前调用一次，之后关键短语全部走缓存命中
pub async fn batch_pregenerate(
    State(state): State<Arc<AppState>>,
    Json(items): Json<Vec<BatchItem>>,
) -> Json<BatchResponse> {
    let report = state
        .pregenerate_handler
        .handle(PregenerateBatch {
            items: items
                .into_iter()
                .map(|item| PregenerateItem {
                    text: item.text,
                    quality: item.quality,
                })
                .collect(),
        })
        .await;

    Json(BatchResponse {
        status: "complete",
        results: report
            .results
            .into_iter()
            .map(|r| BatchItemResult {
                text: r.text,
                status: r.status.as_str(),
                error: r.error,
            })
            .collect(),
        total_cached: report.total_cached,
    })
}
