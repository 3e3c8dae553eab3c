//! 사주 해석 프롬프트 빌더
//!
//! 정규화된 요청을 하나의 자연어 지시문으로 변환하는 순수 함수입니다.
//! 공통 가드라인(언어/형식/안전 제약)을 먼저 두고, 카테고리별 요청문을
//! 빈 줄로 구분해 이어 붙입니다.

use chrono::{Datelike, Local};

use super::dto::{Category, FortuneInput};

/// 완성 요청의 system 메시지
pub const SYSTEM_PROMPT: &str =
    "You are a concise Korean fortune interpreter (사주). Stay strictly on topic.";

/// 상대방 정보 미입력 시 프롬프트에 표기하는 마커
const PARTNER_NOT_PROVIDED: &str = "미입력";

/// 정규화된 입력으로부터 전체 프롬프트 생성
///
/// 부수 효과 없음. 내년 운세의 기준 연도만 현재 시각에 의존합니다.
pub fn build_prompt(input: &FortuneInput) -> String {
    build_prompt_for_year(input, upcoming_year())
}

/// 다가오는 해 (현재 연도 + 1)
fn upcoming_year() -> i32 {
    Local::now().year() + 1
}

fn build_prompt_for_year(input: &FortuneInput, next_year: i32) -> String {
    format!("{}\n\n{}", guideline(&input.tz), request_body(input, next_year))
}

/// 공통 가드라인: 친절하지만 과장 없이, 현실 조언 포함
fn guideline(tz: &str) -> String {
    format!(
        r#"당신은 한국 사용자를 위한 사주 해석가입니다. 반드시 한국어로 친절하고 차분하게 답합니다.
- 입력: 생년월일, 태어난 시간(모르면 00:00), 시간대({tz}).
- 출력: 마크다운 없이 순수 텍스트. 핵심 → 이유 → 현실 조언 순서로 간결하게.
- 금지: 의료/법률/투자 확정 조언, 미신 강요, 개인정보 추가 수집 유도.
- 톤: 위로와 격려를 담되, 과장이나 단정은 피함. 실행 가능한 작은 조언 2~3개 포함.
- 길이: 400~700자.
- 요청 범위를 넘는 질문은 정중히 거절(사주 관련 범주만).
- 로또/복권 관련 언급은 반드시 "엔터테인먼트 목적" 문구 포함."#
    )
}

/// 카테고리별 요청문
fn request_body(input: &FortuneInput, next_year: i32) -> String {
    let intent = input.category.intent_label();

    match input.category {
        Category::Match => {
            let partner_date = input
                .partner_date
                .as_deref()
                .unwrap_or(PARTNER_NOT_PROVIDED);

            format!(
                r#"{intent}을 따뜻하고 현실적으로 설명하세요.
두 사람 정보
A: {} {}
B: {partner_date} {}
1) 소통 스타일  2) 가치관/생활리듬  3) 갈등 포인트와 해결 팁(구체적 행동 2~3개)
마지막에 서로에게 도움이 되는 한 문장 조언과, 가볍게 참고할 만한 좋은 타이밍 힌트 1개를 덧붙이세요."#,
                input.birth_date, input.birth_time, input.partner_time
            )
        }
        Category::NextYear => format!(
            r#"다가오는 {next_year}년의 전체 운세를 카테고리별로 자세히 설명하세요.
대상: {} {}
형식:
- 총평: 2~3줄로 분위기와 키워드
- 건강: 2~3줄(생활습관/컨디션 관리 팁 1~2개)
- 학업/직장: 2~3줄(집중할 분야·관계 팁)
- 재물: 2~3줄(지출·저축·투자 시 유의점, 복권은 엔터테인먼트 목적)
- 사랑: 2~3줄(솔로/커플 모두에게 적용 가능한 실천 팁)
마지막에 한 문장으로 내년에 도움이 될 간단한 루틴을 제안하세요."#,
            input.birth_date, input.birth_time
        ),
        _ => format!(
            r#"{intent}을 친절하고 명확하게 설명하세요.
대상: {} {}
먼저 핵심 요약 3줄을 제시하고,
이어 세부 해석 4~6줄(이유와 상황별 팁 포함),
마지막에 오늘/이번 달에 바로 적용할 수 있는 현실 조언 1줄을 덧붙이세요."#,
            input.birth_date, input.birth_time
        ),
    }
}
