//! Canned tables and the deterministic default response.

use super::form::{NormalizeContext, SALES_UNIT_KRW};
use super::result::{
    Diagnosis, ExpectedResults, Figures, Increase, Keywords, Strategy, StrategyResult, WeekLabel,
    WeekPlan,
};
use crate::config::NormalizerLimits;

pub const SALES_UPLIFT_PERCENT: u32 = 30;
pub const PROFIT_UPLIFT_PERCENT: u32 = 40;
/// Assumed margin when the owner did not enter a real profit figure.
pub const DEFAULT_MARGIN_PERCENT: u64 = 25;
pub const DEFAULT_ROI: f64 = 3.5;
pub const DEFAULT_PERIOD: &str = "3개월";
pub const DEFAULT_DIFFICULTY: &str = "중";

pub const DEFAULT_STRENGTHS: [&str; 3] = ["지역 내 인지도", "기존 고객 만족도", "서비스 품질"];
pub const DEFAULT_WEAKNESSES: [&str; 3] =
    ["신규 고객 유입 부족", "온라인 마케팅 미흡", "재방문율 개선 필요"];

const PLAN_THEMES: [&str; 12] = [
    "현황 진단 및 기초 정비",
    "온라인 플레이스 최적화",
    "리뷰 관리 체계 구축",
    "시그니처 상품 정비",
    "SNS 콘텐츠 루틴 확립",
    "지역 제휴 시작",
    "재방문 프로그램 도입",
    "시즌 이벤트 운영",
    "고객 DB 활용 마케팅",
    "성과 점검 및 개선",
    "우수 전략 확대",
    "다음 분기 계획 수립",
];

const PLAN_DAY_ACTIONS: [&str; 7] = [
    "고객 DB 정리",
    "SNS 콘텐츠 제작",
    "지역 제휴 협의",
    "이벤트 준비",
    "고객 피드백 수집",
    "주간 성과 분석",
    "다음주 계획 수립",
];

// (title, description, cost, difficulty, effect)
type CannedStrategy = (&'static str, &'static str, &'static str, &'static str, &'static str);

const CLINIC_STRATEGIES: [CannedStrategy; 2] = [
    (
        "증상별 안내 콘텐츠 발행",
        "허리·목·어깨 등 증상별 치료 과정을 짧은 글과 사진으로 정리해 플레이스 소식에 주 2회 게시",
        "0원",
        "하",
        "플레이스 유입 20% 증가",
    ),
    (
        "직장인 점심 진료 타임 홍보",
        "한가한 평일 점심 시간대를 직장인 전용 빠른 진료 시간으로 알리고 인근 오피스에 전단 배포",
        "10만원",
        "중",
        "평일 점심 예약 월 15건 증가",
    ),
];

const CAFE_STRATEGIES: [CannedStrategy; 2] = [
    (
        "시그니처 메뉴 스토리 콘텐츠",
        "대표 메뉴의 재료와 제조 과정을 릴스로 제작해 주 3회 업로드",
        "3만원",
        "하",
        "SNS 저장 수 2배 증가",
    ),
    (
        "스탬프 재방문 프로그램",
        "10회 방문 시 음료 1잔 제공하는 스탬프 카드를 도입하고 카카오 채널 친구 추가와 연동",
        "5만원",
        "하",
        "재방문율 15% 개선",
    ),
];

const GYM_STRATEGIES: [CannedStrategy; 2] = [
    (
        "1일 체험권 이벤트",
        "네이버 예약으로 1일 체험권을 판매하고 체험 당일 등록 시 첫 달 할인 제공",
        "0원",
        "하",
        "신규 등록 월 10명 증가",
    ),
    (
        "회원 변화 기록 콘텐츠",
        "동의한 회원의 8주 변화 기록을 인스타그램 시리즈로 게시",
        "0원",
        "중",
        "문의 DM 월 20건 증가",
    ),
];

const NAIL_STRATEGIES: [CannedStrategy; 2] = [
    (
        "시즌 디자인 사전 예약",
        "다음 달 시즌 디자인 샘플을 미리 공개하고 사전 예약 고객에게 소폭 할인 제공",
        "2만원",
        "하",
        "예약 공백 30% 감소",
    ),
    (
        "리터치 주기 알림",
        "시술 3주 후 카카오톡으로 리터치 안내 메시지를 발송",
        "1만원",
        "하",
        "재방문 주기 1주 단축",
    ),
];

const CLINIC_TAGS: [&str; 5] = ["#한의원", "#통증치료", "#추나요법", "#침술", "#한방치료"];
const CAFE_TAGS: [&str; 5] = ["#카페", "#카페스타그램", "#커피", "#디저트", "#카페추천"];
const GYM_TAGS: [&str; 5] = ["#헬스", "#헬스장", "#PT", "#다이어트", "#운동"];
const NAIL_TAGS: [&str; 5] = ["#네일", "#네일아트", "#젤네일", "#네일샵", "#네일스타그램"];

fn industry_strategy_table(industry: &str) -> Option<&'static [CannedStrategy]> {
    match industry {
        "한의원" => Some(&CLINIC_STRATEGIES[..]),
        "카페" => Some(&CAFE_STRATEGIES[..]),
        "헬스장" => Some(&GYM_STRATEGIES[..]),
        "네일샵" => Some(&NAIL_STRATEGIES[..]),
        _ => None,
    }
}

fn industry_tag_table(industry: &str) -> &'static [&'static str] {
    match industry {
        "한의원" => &CLINIC_TAGS[..],
        "카페" => &CAFE_TAGS[..],
        "헬스장" => &GYM_TAGS[..],
        "네일샵" => &NAIL_TAGS[..],
        _ => &[],
    }
}

pub fn default_diagnosis() -> Diagnosis {
    Diagnosis {
        strengths: DEFAULT_STRENGTHS.iter().map(|s| s.to_string()).collect(),
        weaknesses: DEFAULT_WEAKNESSES.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_strategies(industry: &str) -> Vec<Strategy> {
    match industry_strategy_table(industry) {
        Some(table) => table
            .iter()
            .map(|&(title, description, cost, difficulty, effect)| Strategy {
                title: title.to_string(),
                description: description.to_string(),
                cost: cost.to_string(),
                difficulty: difficulty.to_string(),
                effect: effect.to_string(),
            })
            .collect(),
        None => vec![Strategy {
            title: "지역 제휴 마케팅".to_string(),
            description: if industry.is_empty() {
                "인근 업체와 제휴하여 상호 할인 혜택 제공".to_string()
            } else {
                format!("{industry} 고객층과 겹치는 인근 업체와 제휴하여 상호 할인 혜택 제공")
            },
            cost: "5만원".to_string(),
            difficulty: "하".to_string(),
            effect: "신규 고객 월 10명 증가".to_string(),
        }],
    }
}

pub fn default_weekly_plan(weeks: usize) -> Vec<WeekPlan> {
    (0..weeks)
        .map(|i| WeekPlan {
            week: WeekLabel::Number(i as u32 + 1),
            theme: PLAN_THEMES[i % PLAN_THEMES.len()].to_string(),
            days: PLAN_DAY_ACTIONS.iter().map(|d| d.to_string()).collect(),
        })
        .collect()
}

pub fn default_hashtags(industry: &str, district: &str, max: usize) -> Vec<String> {
    let location = [
        "#마포".to_string(),
        format!("#마포{industry}"),
        format!("#{district}"),
        format!("#{district}맛집"),
    ];
    location
        .into_iter()
        .chain(industry_tag_table(industry).iter().map(|t| t.to_string()))
        .take(max)
        .collect()
}

pub fn default_keywords(industry: &str, district: &str) -> Keywords {
    let short = district.strip_suffix('동').unwrap_or(district);
    Keywords {
        naver: vec![
            format!("마포 {industry}"),
            format!("{district} {industry}"),
            format!("{short} {industry}"),
            format!("마포 추천 {industry}"),
            format!("{district} 맛집"),
        ],
        kakao: vec![
            format!("{district} {industry}"),
            format!("마포구 {industry}"),
            format!("{short} {industry} 추천"),
            format!("홍대 {industry}"),
            format!("합정 {industry}"),
        ],
    }
}

// round(value * percent / 100), half up, without going through floats.
fn percent_of(value: u64, percent: u64) -> u64 {
    value.saturating_mul(percent).saturating_add(50) / 100
}

pub fn expected_results(ctx: &NormalizeContext) -> ExpectedResults {
    let sales = ctx.monthly_sales.saturating_mul(SALES_UNIT_KRW);
    let profit = match ctx.real_profit {
        Some(p) => p.saturating_mul(SALES_UNIT_KRW),
        None => percent_of(sales, DEFAULT_MARGIN_PERCENT),
    };

    let after_sales = percent_of(sales, 100 + SALES_UPLIFT_PERCENT as u64);
    let profit_gain = percent_of(profit, PROFIT_UPLIFT_PERCENT as u64);

    ExpectedResults {
        current: Figures { sales, profit },
        after: Figures {
            sales: after_sales,
            profit: profit.saturating_add(profit_gain),
        },
        increase: Increase {
            sales: after_sales.saturating_sub(sales),
            profit: profit_gain,
            sales_percent: SALES_UPLIFT_PERCENT,
            profit_percent: PROFIT_UPLIFT_PERCENT,
        },
        roi: DEFAULT_ROI,
        period: DEFAULT_PERIOD.to_string(),
    }
}

/// Builds the full fallback response for a submission. Same context, same output.
pub fn default_response(ctx: &NormalizeContext, limits: &NormalizerLimits) -> StrategyResult {
    StrategyResult {
        diagnosis: default_diagnosis(),
        strategies: default_strategies(&ctx.industry),
        weekly_plan: default_weekly_plan(limits.plan_weeks),
        hashtags: default_hashtags(&ctx.industry, &ctx.district, limits.max_hashtags),
        keywords: default_keywords(&ctx.industry, &ctx.district),
        expected_results: expected_results(ctx),
    }
}
