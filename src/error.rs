use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// 에러 응답 형식
///
/// 업스트림 실패 시 진단을 위해 원문(`raw`)과 상태 코드를 그대로 보존합니다.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// 에러 메시지
    #[schema(example = "birthDate required")]
    pub error: String,

    /// 업스트림 HTTP 상태 코드 (업스트림 실패 시에만 포함)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// 업스트림 응답 원문 (업스트림 실패 시에만 포함)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// 요청 처리 중 발생하는 에러
///
/// 내부에서는 태그된 에러로 전파하고, HTTP 상태/바디 매핑은
/// `IntoResponse` 경계에서만 수행합니다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("birthDate required")]
    MissingBirthDate,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("OPENAI_API_KEY missing (check Preview/Production env)")]
    MissingApiKey,

    #[error("OpenAI request failed")]
    UpstreamFailure { status: u16, raw: String },

    #[error("Empty completion")]
    EmptyCompletion { raw: String },

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingBirthDate => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamFailure { .. } => StatusCode::BAD_GATEWAY,
            AppError::EmptyCompletion { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::UpstreamFailure {
                status: upstream,
                raw,
            } => ErrorResponse {
                error: "OpenAI request failed".to_string(),
                status: Some(upstream),
                raw: Some(raw),
            },
            AppError::EmptyCompletion { raw } => ErrorResponse {
                error: "Empty completion".to_string(),
                status: None,
                raw: Some(raw),
            },
            other => ErrorResponse {
                error: other.to_string(),
                status: None,
                raw: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Internal(rejection.body_text())
    }
}
