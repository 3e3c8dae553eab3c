use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 운세 카테고리
///
/// 인식되지 않거나 생략된 값은 오늘 운세로 처리합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Today,
    Month,
    NextYear,
    Wealth,
    Love,
    Match,
}

impl Category {
    /// 요청의 `type` 문자열을 카테고리로 변환 (전체 함수, 실패 없음)
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("today") => Category::Today,
            Some("month") => Category::Month,
            Some("nextyear") => Category::NextYear,
            Some("wealth") => Category::Wealth,
            Some("love") => Category::Love,
            Some("match") => Category::Match,
            _ => Category::Today,
        }
    }

    /// 프롬프트에 들어가는 의도 라벨
    pub fn intent_label(self) -> &'static str {
        match self {
            Category::Today => "오늘 운세",
            Category::Month => "한달 운세",
            Category::NextYear => "내년 운세",
            Category::Wealth => "재물운",
            Category::Love => "연애/결혼운",
            Category::Match => "궁합",
        }
    }
}

/// 사주 해석 요청
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct FortuneRequest {
    /// 운세 카테고리 (today|month|nextyear|wealth|love|match, 기본 today)
    #[schema(example = "today")]
    #[serde(rename = "type")]
    pub category: Option<String>,

    /// 생년월일 (필수)
    #[validate(
        required(message = "birthDate required"),
        length(min = 1, message = "birthDate required")
    )]
    #[schema(example = "1990-01-01")]
    #[serde(rename = "birthDate")]
    pub birth_date: Option<String>,

    /// 태어난 시간 (기본 00:00)
    #[schema(example = "08:30")]
    #[serde(rename = "birthTime")]
    pub birth_time: Option<String>,

    /// 상대방 생년월일 (궁합에서만 사용, 미입력 허용)
    #[schema(example = "1992-05-15")]
    #[serde(rename = "partnerDate")]
    pub partner_date: Option<String>,

    /// 상대방 태어난 시간 (기본 00:00)
    #[schema(example = "14:00")]
    #[serde(rename = "partnerTime")]
    pub partner_time: Option<String>,

    /// 시간대 (기본 Asia/Seoul)
    #[schema(example = "Asia/Seoul")]
    pub tz: Option<String>,
}

/// 기본값이 모두 채워진 정규화 요청
///
/// 분기 로직이 실행되기 전에 한 번에 정규화하며, 이후 단계에서는
/// 기본값 처리가 다시 나타나지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortuneInput {
    pub category: Category,
    pub birth_date: String,
    pub birth_time: String,
    pub partner_date: Option<String>,
    pub partner_time: String,
    pub tz: String,
}

impl FortuneRequest {
    /// 기본값을 적용한 정규화 입력 생성
    ///
    /// `validate()` 통과 후 호출을 전제로 하며, `birth_date`가 비어 있으면
    /// 빈 문자열로 채워집니다 (검증은 핸들러의 책임).
    pub fn normalize(self) -> FortuneInput {
        FortuneInput {
            category: Category::parse(self.category.as_deref()),
            birth_date: self.birth_date.unwrap_or_default(),
            birth_time: self.birth_time.unwrap_or_else(|| "00:00".to_string()),
            partner_date: self.partner_date.filter(|date| !date.is_empty()),
            partner_time: self.partner_time.unwrap_or_else(|| "00:00".to_string()),
            tz: self.tz.unwrap_or_else(|| "Asia/Seoul".to_string()),
        }
    }
}

/// 사주 해석 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FortuneResponse {
    /// 생성된 해석 텍스트 (양끝 공백 제거)
    #[schema(example = "오늘은 차분하게 계획을 정리하기 좋은 날입니다...")]
    pub text: String,
}

/// 헬스체크 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = true)]
    pub ok: bool,

    /// OpenAI API 키 설정 여부
    #[schema(example = true)]
    #[serde(rename = "hasKey")]
    pub has_key: bool,
}
