//! HTTP Middleware
//!
//! HTTP 状态码错误日志中间件

use axum::{extract::Request, middleware::Next, response::Response};

/// HTTP 状态码错误日志中间件
///
/// 拦截响应，4xx 记 warn、5xx 记 error。
/// ApiError 在 into_response() 里已带错误详情记录过日志，
/// 这里补的是不经过 ApiError 的状态码：路由 404、extractor 拒绝（415/422）等
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn audio_handler() -> &'static str {
        "RIFF"
    }

    async fn rejected_handler() -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    async fn engine_down_handler() -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/audio", get(audio_handler))
            .route("/rejected", get(rejected_handler))
            .route("/engine-down", get(engine_down_handler))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    #[tokio::test]
    async fn test_success_passes_through_untouched() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .uri("/audio")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_client_error_preserved() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .uri("/rejected")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_server_error_preserved() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .uri("/engine-down")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
