//! `/saju` 엔드포인트 핸들러
//!
//! 검증 → 프롬프트 생성 → 완성 호출 → 응답 매핑 순서로 처리합니다.
//! 에러는 `AppError`로 전파하고 HTTP 매핑은 경계에서만 수행합니다.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;
use crate::AppState;

use super::dto::{FortuneRequest, FortuneResponse, HealthResponse};
use super::prompt::{self, SYSTEM_PROMPT};

#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    health: Option<String>,
}

/// 헬스체크
///
/// `GET /saju?health=1`로 서비스 가동 여부와 API 키 설정 여부를 확인합니다.
/// 완성 API는 호출하지 않습니다. 헬스 플래그가 없는 GET은 허용되지 않습니다.
#[utoipa::path(
    get,
    path = "/saju",
    tag = "Saju",
    params(
        ("health" = Option<String>, Query, description = "1이면 헬스체크 수행")
    ),
    responses(
        (status = 200, description = "헬스체크 성공", body = HealthResponse),
        (status = 405, description = "헬스 플래그 없는 GET", body = crate::error::ErrorResponse)
    )
)]
pub async fn health(State(state): State<AppState>, Query(query): Query<HealthQuery>) -> Response {
    if query.health.as_deref() != Some("1") {
        return AppError::MethodNotAllowed.into_response();
    }

    let has_key = state.completion.is_some();
    tracing::debug!(has_key, "Health check");

    Json(HealthResponse { ok: true, has_key }).into_response()
}

/// CORS preflight
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// 허용되지 않은 메서드 (GET/POST/OPTIONS 외)
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// 사주 해석 생성
///
/// 생년월일 정보로 프롬프트를 구성해 OpenAI 완성 결과를 반환합니다.
#[utoipa::path(
    post,
    path = "/saju",
    tag = "Saju",
    request_body = FortuneRequest,
    responses(
        (status = 200, description = "해석 생성 성공", body = FortuneResponse),
        (status = 400, description = "birthDate 누락", body = crate::error::ErrorResponse),
        (status = 500, description = "서버 설정 오류 또는 내부 에러", body = crate::error::ErrorResponse),
        (status = 502, description = "업스트림 실패 또는 빈 완성", body = crate::error::ErrorResponse)
    )
)]
pub async fn fortune(
    State(state): State<AppState>,
    request: Result<Json<FortuneRequest>, JsonRejection>,
) -> Result<Json<FortuneResponse>, AppError> {
    let Json(request) = request.map_err(AppError::from)?;

    request
        .validate()
        .map_err(|_| AppError::MissingBirthDate)?;

    let input = request.normalize();
    tracing::info!(
        category = ?input.category,
        tz = %input.tz,
        "Fortune request received"
    );

    // 키 미설정이면 업스트림 호출 전에 실패
    let client = state.completion.as_ref().ok_or(AppError::MissingApiKey)?;

    let user_prompt = prompt::build_prompt(&input);
    let text = client.complete(SYSTEM_PROMPT, &user_prompt).await?;

    tracing::info!(text_length = text.len(), "Fortune generated successfully");

    Ok(Json(FortuneResponse { text }))
}
