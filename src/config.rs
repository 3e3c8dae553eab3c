use std::env;

/// 서버 설정
///
/// OpenAI API 키는 선택 사항입니다. 키가 없어도 서버는 기동하며
/// 헬스체크가 `hasKey: false`를 보고합니다 (Preview/Production 환경에서
/// 키 누락을 배포 후에도 진단할 수 있도록).
#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .unwrap_or(8080),
        }
    }
}
