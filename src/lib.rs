//! 사주 해석 API 서버
//!
//! 생년월일 정보를 받아 한국어 사주 해석 프롬프트를 구성하고,
//! OpenAI Chat Completions API 호출 결과를 반환하는 단일 엔드포인트 서버입니다.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod config;
pub mod domain;
pub mod error;
pub mod global;
pub mod shutdown;

use config::AppConfig;
use domain::fortune::client::{CompletionClient, OpenAiClient};
use domain::fortune::handler;

/// 핸들러 간 공유 상태
///
/// API 키가 설정되지 않은 경우 `completion`은 `None`이며,
/// 헬스체크의 `hasKey`가 false로 보고되고 POST 요청은 500으로 실패합니다.
#[derive(Clone)]
pub struct AppState {
    pub completion: Option<Arc<dyn CompletionClient>>,
}

/// 프로덕션 라우터 생성
///
/// 설정에서 OpenAI 클라이언트를 구성합니다. 키가 없어도 서버는 기동하며,
/// 키 부재는 요청 시점에 에러로 보고됩니다.
pub fn create_app(config: &AppConfig) -> Router {
    let completion = config.openai_api_key.as_ref().map(|key| {
        Arc::new(OpenAiClient::new(
            key.clone(),
            config.openai_api_base.clone(),
        )) as Arc<dyn CompletionClient>
    });

    create_router(AppState { completion })
}

/// 테스트용 라우터 생성 (Mock 완성 클라이언트 주입)
pub fn create_test_router_with_mock(client: impl CompletionClient + 'static) -> Router {
    create_router(AppState {
        completion: Some(Arc::new(client)),
    })
}

/// 테스트용 라우터 생성 (API 키 미설정 상태)
pub fn create_test_router_without_key() -> Router {
    create_router(AppState { completion: None })
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/saju",
            get(handler::health)
                .post(handler::fortune)
                .options(handler::preflight)
                .fallback(handler::method_not_allowed),
        )
        .layer(middleware::from_fn(global::middleware::cors_headers))
        .layer(middleware::from_fn(global::middleware::request_tracing))
        .with_state(state)
}
