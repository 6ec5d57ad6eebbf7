use crate::config::FormLimits;
use crate::core::form::FormInput;
use crate::error::LabError;
use std::fmt::Write;
use std::str::FromStr;

pub const CONSULTANT_PROMPT: &str = r#"
당신은 생존이 걸린 골목상권에서 가게를 살려내는 10년 이상 경력의 로컬 비즈니스 마케팅/그로스 컨설턴트입니다.
목표는 "보기 좋은 조언"이 아니라 12주 안에 매출, 신규 고객, 재방문을 실제로 올리는 실행안입니다.

[중요 규칙]
- 근거 없는 업계 평균이나 수치를 만들어내지 마세요.
- 입력 정보로 계산 가능한 수치는 계산식과 함께 제시하세요.
- 모르는 정보는 (가정)으로 표시하고 검증 방법을 함께 제시하세요.
- 업종별 법/플랫폼 정책 리스크가 있으면 경고와 대체 표현을 제시하세요.
"#;

pub const DETAILED_RESPONSE_SHAPE: &str = r##"
# 응답 형식: 반드시 유효한 JSON만 응답하세요
{
  "diagnosis": {
    "strengths": [{"title": "강점", "data": "데이터", "interpretation": "해석", "implication": "시사점"}],
    "weaknesses": [{"title": "약점", "data": "데이터 또는 (가정)", "interpretation": "해석", "implication": "시사점"}]
  },
  "strategies": [
    {"title": "전략명", "kpi": "목표", "steps": ["1단계", "2단계"], "cost": "비용", "difficulty": "상/중/하", "expectedEffect": "효과", "description": "설명"}
  ],
  "weeklyPlan": [
    {"week": 1, "theme": "테마", "days": ["1일차 액션", "2일차 액션", "3일차 액션", "4일차 액션", "5일차 액션", "6일차 액션", "7일차 액션"]}
  ],
  "hashtags": ["#해시태그"],
  "keywords": {"naver": ["키워드"], "kakao": ["키워드"]}
}
weeklyPlan은 정확히 12주, hashtags는 10개 이상 15개 이하로 작성하세요.
마크다운이나 설명 없이 JSON만 응답하세요.
"##;

pub const COMPACT_RESPONSE_RULE: &str =
    "[중요 규칙] 반드시 유효한 JSON만 응답하세요. 마크다운/설명 금지. \
     필드: diagnosis, strategies, weeklyPlan(12주), hashtags(10~15개), keywords(naver, kakao).";

/// Which prompt template to send upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVersion {
    /// Full consultant brief with an example response shape.
    #[default]
    Detailed,
    /// Short brief for faster, cheaper calls.
    Compact,
    /// Compact brief; the response shape travels as a response schema instead.
    Structured,
}

impl PromptVersion {
    pub fn uses_response_schema(self) -> bool {
        matches!(self, PromptVersion::Structured)
    }
}

impl FromStr for PromptVersion {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" | "v1" => Ok(PromptVersion::Detailed),
            "compact" | "v2" => Ok(PromptVersion::Compact),
            "structured" | "v3" => Ok(PromptVersion::Structured),
            other => Err(LabError::ConfigError(format!("unknown prompt version '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    version: PromptVersion,
    limits: FormLimits,
}

impl PromptBuilder {
    pub fn new(version: PromptVersion, limits: FormLimits) -> Self {
        Self { version, limits }
    }

    pub fn version(&self) -> PromptVersion {
        self.version
    }

    pub fn build(&self, form: &FormInput) -> String {
        let facts = self.store_facts(form);
        match self.version {
            PromptVersion::Detailed => {
                format!("{CONSULTANT_PROMPT}\n# 가게 정보\n{facts}{DETAILED_RESPONSE_SHAPE}")
            }
            PromptVersion::Compact | PromptVersion::Structured => {
                format!("{}\n{COMPACT_RESPONSE_RULE}\n\n# 가게 정보\n{facts}", CONSULTANT_PROMPT.trim())
            }
        }
    }

    // `write!` into a String cannot fail, so results are discarded.
    fn store_facts(&self, form: &FormInput) -> String {
        let mut out = String::new();
        let or_blank = |s: &str| if s.trim().is_empty() { "(미입력)".to_string() } else { s.trim().to_string() };

        let _ = writeln!(out, "- 업종: {}", form.industry);
        let _ = writeln!(out, "- 이름: {}", form.store_name);
        let _ = writeln!(out, "- 위치: 서울 마포구 {}", form.district);
        let _ = writeln!(out, "- 월 평균 매출: {}만원", form.monthly_sales);
        if let Some(profit) = form.real_profit {
            let _ = writeln!(out, "- 월 순이익: {profit}만원");
        }
        let _ = writeln!(out, "- {}", platform_text(form));
        let _ = match hit_product(form) {
            Some(name) => writeln!(out, "- 주요 히트 상품: {name}"),
            None => writeln!(out, "- 주요 히트 상품 없음 (신규 시그니처 메뉴 개발 필요)"),
        };
        let _ = writeln!(out, "- 현재 고민: {}", or_blank(&form.concerns.join(", ")));
        let _ = writeln!(out, "- 가게 강점: {}", or_blank(&form.unique_strength));

        let services: Vec<String> = form
            .top_services
            .iter()
            .take(self.limits.top_services)
            .map(|s| {
                let hit = if s.is_hit { " (인기)" } else { "" };
                format!("{} {}원{hit}", s.name, s.price)
            })
            .collect();
        let _ = writeln!(out, "- 주요 서비스/가격: {}", or_blank(&services.join(", ")));
        let _ = writeln!(out, "- 예약 방식: {}", or_blank(&form.booking_methods.join(", ")));
        let _ = writeln!(out, "- 결제 방식: {}", or_blank(&form.payment_methods.join(", ")));

        if !form.reviews.is_empty() {
            let _ = writeln!(out, "- 리뷰 현황:");
            for (platform, stat) in &form.reviews {
                match stat.rating {
                    Some(rating) => {
                        let _ = writeln!(out, "  * {}: {}개, 평점 {rating}/5.0", platform_label(platform), stat.count);
                    }
                    None => {
                        let _ = writeln!(out, "  * {}: {}개", platform_label(platform), stat.count);
                    }
                }
            }
        }

        if !form.competitors.is_empty() {
            let _ = writeln!(out, "- 경쟁 매장:");
            for (i, c) in form.competitors.iter().enumerate() {
                let name: &str = if c.name.is_empty() { "(이름 미입력)" } else { &c.name };
                let feature: &str = if c.feature.is_empty() { "특징 없음" } else { &c.feature };
                let price: &str = if c.price.is_empty() { "가격대 미입력" } else { &c.price };
                let _ = writeln!(out, "  {}. {name} - {feature} - {price}", i + 1);
            }
        }

        if !form.faqs.is_empty() {
            let _ = writeln!(out, "- 고객 자주 묻는 질문:");
            for (i, q) in form.faqs.iter().take(self.limits.faqs).enumerate() {
                let _ = writeln!(out, "  {}. {q}", i + 1);
            }
        }

        if let Some(sns) = &form.sns_info {
            let tags = if sns.no_hashtags || sns.hashtags.trim().is_empty() {
                "해시태그 사용 안 함".to_string()
            } else {
                sns.hashtags.trim().to_string()
            };
            let _ = writeln!(
                out,
                "- SNS: 팔로워 {}명, 주 {}회 게시, {tags}",
                sns.followers, sns.frequency
            );
        }

        if let Some(schedule) = &form.time_schedule {
            for (label, day) in [("평일", &schedule.weekday), ("주말", &schedule.weekend)] {
                if !day.idle.start.is_empty() {
                    let _ = writeln!(out, "- {label} 한가한 시간: {}~{}", day.idle.start, day.idle.end);
                }
                if !day.busy.start.is_empty() {
                    let _ = writeln!(out, "- {label} 바쁜 시간: {}~{}", day.busy.start, day.busy.end);
                }
            }
        }

        for (field, value) in &form.industry_specific {
            if !value.trim().is_empty() {
                let _ = writeln!(out, "- {field}: {}", value.trim());
            }
        }

        out
    }
}

fn platform_label(id: &str) -> &str {
    match id {
        "naver" => "네이버플레이스",
        "kakao" => "카카오맵",
        "google" => "구글",
        _ => "기타",
    }
}

fn platform_text(form: &FormInput) -> String {
    if form.is_offline_only() {
        return "온라인 등록 없음".to_string();
    }
    let labels: Vec<&str> = form.platforms.iter().map(|p| platform_label(p)).collect();
    format!("{} 등록됨", labels.join(", "))
}

// The web form only marks hits on `topServices`; the explicit fields come from older clients.
fn hit_product(form: &FormInput) -> Option<&str> {
    let explicit = form
        .hit_product_name
        .as_deref()
        .map(str::trim)
        .filter(|name| form.has_hit_product && !name.is_empty());
    explicit.or_else(|| {
        form.top_services
            .iter()
            .find(|s| s.is_hit && !s.name.trim().is_empty())
            .map(|s| s.name.trim())
    })
}
