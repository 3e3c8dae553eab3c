//! OpenAI Chat Completions 클라이언트
//!
//! 업스트림 실패 진단을 위해 응답 바디를 항상 텍스트로 먼저 읽고,
//! 상태 코드와 원문을 보존한 채 에러로 변환합니다.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 모델 완성 클라이언트 추상화
///
/// 테스트에서 Mock으로 대체할 수 있도록 트레이트 경계를 둡니다.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// system/user 메시지로 완성 텍스트 생성
    ///
    /// 성공 시 양끝 공백이 제거된 비어 있지 않은 텍스트를 반환합니다.
    async fn complete(&self, system: &str, user: &str) -> Result<String, AppError>;
}

const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.8;
const MAX_TOKENS: u32 = 600;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI API 클라이언트
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, api_base: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key,
            api_base,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AppError> {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let url = format!("{}/v1/chat/completions", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let status = response.status();
        // 원문 확보 (실패 시 진단 정보로 그대로 반환)
        let raw = response
            .text()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        parse_completion(status, &raw)
    }
}

/// 업스트림 응답을 완성 텍스트 또는 에러로 변환
///
/// 비 2xx는 상태 코드와 원문을 보존한 업스트림 실패로,
/// 2xx지만 사용 가능한 텍스트가 없으면 빈 완성으로 처리합니다.
fn parse_completion(status: StatusCode, raw: &str) -> Result<String, AppError> {
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "OpenAI request failed");
        return Err(AppError::UpstreamFailure {
            status: status.as_u16(),
            raw: raw.to_string(),
        });
    }

    let text = serde_json::from_str::<ChatResponse>(raw)
        .ok()
        .and_then(|response| response.choices.into_iter().next())
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty());

    text.ok_or_else(|| {
        tracing::warn!("OpenAI returned no usable completion");
        AppError::EmptyCompletion {
            raw: raw.to_string(),
        }
    })
}
