//! Handler 테스트
//!
//! axum-test를 사용한 HTTP 핸들러 레이어 테스트

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use saju_server::domain::fortune::client::CompletionClient;
use saju_server::error::AppError;
use saju_server::{create_test_router_with_mock, create_test_router_without_key};

/// 테스트용 Mock 완성 클라이언트 (성공 응답, 호출 횟수 기록)
struct MockCompletionSuccess {
    response: String,
    calls: Arc<AtomicUsize>,
}

impl MockCompletionSuccess {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl CompletionClient for MockCompletionSuccess {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.trim().to_string())
    }
}

/// 테스트용 Mock 완성 클라이언트 (업스트림 실패)
struct MockCompletionUpstreamFailure {
    status: u16,
    raw: String,
}

#[async_trait::async_trait]
impl CompletionClient for MockCompletionUpstreamFailure {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AppError> {
        Err(AppError::UpstreamFailure {
            status: self.status,
            raw: self.raw.clone(),
        })
    }
}

/// 테스트용 Mock 완성 클라이언트 (빈 완성)
struct MockCompletionEmpty;

#[async_trait::async_trait]
impl CompletionClient for MockCompletionEmpty {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AppError> {
        Err(AppError::EmptyCompletion {
            raw: r#"{"choices":[]}"#.to_string(),
        })
    }
}

mod fortune_handler {
    use super::*;

    #[tokio::test]
    async fn should_return_200_with_trimmed_text() {
        // Arrange
        let mock = MockCompletionSuccess::new("  오늘은 차분하게 보내기 좋은 날입니다.  ");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server
            .post("/saju")
            .json(&json!({ "birthDate": "1990-01-01" }))
            .await;

        // Assert
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["text"], "오늘은 차분하게 보내기 좋은 날입니다.");
    }

    #[tokio::test]
    async fn should_return_400_without_birth_date_and_skip_outbound_call() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let calls = mock.calls.clone();
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server.post("/saju").json(&json!({})).await;

        // Assert
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "birthDate required");
        assert_eq!(calls.load(Ordering::SeqCst), 0, "no outbound call expected");
    }

    #[tokio::test]
    async fn should_return_400_for_empty_birth_date() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server
            .post("/saju")
            .json(&json!({ "birthDate": "" }))
            .await;

        // Assert
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "birthDate required");
    }

    #[tokio::test]
    async fn should_return_500_when_api_key_is_missing() {
        // Arrange
        let server = TestServer::new(create_test_router_without_key()).unwrap();

        // Act
        let response = server
            .post("/saju")
            .json(&json!({ "birthDate": "1990-01-01" }))
            .await;

        // Assert
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("OPENAI_API_KEY missing"));
    }

    #[tokio::test]
    async fn should_return_502_with_upstream_status_and_raw_body() {
        // Arrange
        let mock = MockCompletionUpstreamFailure {
            status: 401,
            raw: r#"{"error":{"message":"Incorrect API key"}}"#.to_string(),
        };
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server
            .post("/saju")
            .json(&json!({ "birthDate": "1990-01-01" }))
            .await;

        // Assert
        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "OpenAI request failed");
        assert_eq!(body["status"], 401);
        assert_eq!(body["raw"], r#"{"error":{"message":"Incorrect API key"}}"#);
    }

    #[tokio::test]
    async fn should_return_502_for_empty_completion() {
        // Arrange
        let server = TestServer::new(create_test_router_with_mock(MockCompletionEmpty)).unwrap();

        // Act
        let response = server
            .post("/saju")
            .json(&json!({ "birthDate": "1990-01-01" }))
            .await;

        // Assert
        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Empty completion");
        assert_eq!(body["raw"], r#"{"choices":[]}"#);
    }

    #[tokio::test]
    async fn should_return_500_for_malformed_json_body() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server
            .post("/saju")
            .content_type("application/json")
            .bytes("{invalid json}".as_bytes().into())
            .await;

        // Assert
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn repeated_identical_requests_should_each_call_provider() {
        // Arrange: 완성 결과는 캐시되지 않아야 함
        let mock = MockCompletionSuccess::new("결과");
        let calls = mock.calls.clone();
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();
        let body = json!({ "birthDate": "1990-01-01", "type": "wealth" });

        // Act
        let first = server.post("/saju").json(&body).await;
        let second = server.post("/saju").json(&body).await;

        // Assert
        first.assert_status_ok();
        second.assert_status_ok();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn should_accept_match_request_without_partner_date() {
        // Arrange: 궁합에서 상대방 정보 미입력은 에러가 아님
        let mock = MockCompletionSuccess::new("두 분은 서로 보완적인 성향입니다.");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server
            .post("/saju")
            .json(&json!({ "type": "match", "birthDate": "1990-01-01" }))
            .await;

        // Assert
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn should_default_unrecognized_category_to_today() {
        // Arrange
        let mock = MockCompletionSuccess::new("결과");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server
            .post("/saju")
            .json(&json!({ "type": "lottery", "birthDate": "1990-01-01" }))
            .await;

        // Assert: 인식되지 않은 카테고리는 검증 에러가 아닌 기본값 처리
        response.assert_status_ok();
    }
}

mod health_handler {
    use super::*;

    #[tokio::test]
    async fn should_report_has_key_true_when_client_configured() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let calls = mock.calls.clone();
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server.get("/saju").add_query_param("health", "1").await;

        // Assert
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["ok"], true);
        assert_eq!(body["hasKey"], true);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "no outbound call expected");
    }

    #[tokio::test]
    async fn should_report_has_key_false_when_key_missing() {
        // Arrange
        let server = TestServer::new(create_test_router_without_key()).unwrap();

        // Act
        let response = server.get("/saju").add_query_param("health", "1").await;

        // Assert
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["ok"], true);
        assert_eq!(body["hasKey"], false);
    }

    #[tokio::test]
    async fn get_without_health_flag_should_return_405() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server.get("/saju").await;

        // Assert
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Method not allowed");
    }
}

mod cors_and_methods {
    use super::*;

    #[tokio::test]
    async fn options_should_return_204_with_cors_headers_and_empty_body() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server.method(Method::OPTIONS, "/saju").await;

        // Assert
        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.as_bytes().is_empty());

        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET,POST,OPTIONS"
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "Content-Type, Authorization"
        );
    }

    #[tokio::test]
    async fn cors_headers_should_be_present_on_error_responses() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server.post("/saju").json(&json!({})).await;

        // Assert
        response.assert_status_bad_request();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn cors_headers_should_be_present_on_success_responses() {
        // Arrange
        let mock = MockCompletionSuccess::new("결과");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server
            .post("/saju")
            .json(&json!({ "birthDate": "1990-01-01" }))
            .await;

        // Assert
        response.assert_status_ok();
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET,POST,OPTIONS"
        );
    }

    #[tokio::test]
    async fn put_should_return_405_with_error_body() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server.method(Method::PUT, "/saju").await;

        // Assert
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn delete_should_return_405_with_error_body() {
        // Arrange
        let mock = MockCompletionSuccess::new("test");
        let server = TestServer::new(create_test_router_with_mock(mock)).unwrap();

        // Act
        let response = server.method(Method::DELETE, "/saju").await;

        // Assert
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Method not allowed");
    }
}
