//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{EngineError, GenerationError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API 错误
///
/// 生成接口直接回音频字节，没有可复用的 JSON 信封，
/// 错误一律用真实 HTTP 状态码加 `{"error": ...}` 响应体表达。
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
    ServiceUnavailable(String),
    Timeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(error = %msg, "Service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            ApiError::Timeout(msg) => {
                tracing::error!(error = %msg, "Synthesis timed out");
                (StatusCode::GATEWAY_TIMEOUT, msg)
            }
        };

        (status, Json(ErrorResponse { error: msg })).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        let msg = e.to_string();
        match e {
            GenerationError::EmptyText => ApiError::BadRequest(msg),
            GenerationError::Timeout(_) => ApiError::Timeout(msg),
            GenerationError::Engine(EngineError::Timeout) => ApiError::Timeout(msg),
            GenerationError::Engine(EngineError::Unavailable(_)) => {
                ApiError::ServiceUnavailable(msg)
            }
            GenerationError::Engine(_) => ApiError::Internal(msg),
        }
    }
}
