//! 전역 미들웨어
//!
//! 요청 추적(요청 ID, 소요 시간, 메트릭)과 CORS 응답 헤더를 담당합니다.

use axum::{
    body::Body,
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

/// 모든 응답 경로에 CORS 헤더를 추가하는 미들웨어
///
/// 에러 응답을 포함한 모든 응답에 동일한 헤더가 실려야 하므로
/// 핸들러가 아닌 미들웨어에서 일괄 처리합니다.
pub async fn cors_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("Content-Type, Authorization"),
    );

    response
}

/// 요청 단위 추적 미들웨어
///
/// 요청마다 고유 ID를 부여해 tracing span을 만들고,
/// 완료 시 상태 코드와 소요 시간을 로깅하고 메트릭을 기록합니다.
pub async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );
    let _guard = span.enter();

    tracing::info!("Request started");
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path,
        "status" => status.as_u16().to_string()
    )
    .record(duration.as_secs_f64());

    response
}
