use super::defaults::{self, DEFAULT_DIFFICULTY, DEFAULT_STRENGTHS, DEFAULT_WEAKNESSES};
use super::form::NormalizeContext;
use super::result::{
    Diagnosis, ExpectedResults, Keywords, Strategy, StrategyResult, WeekLabel, WeekPlan,
};
use crate::config::NormalizerLimits;
use crate::error::LabError;
use serde_json::{Map, Value};

const FENCE: &str = "```";
const FALLBACK_DESCRIPTION: &str = "상세 설명";
const FALLBACK_COST: &str = "미정";
const FALLBACK_EFFECT: &str = "효과 측정 필요";

/// Returns the interior of the first fenced block, or the trimmed text when there is none.
///
/// The block closes at the last fence that begins a line, so backticks quoted
/// inside the payload survive. Without one it falls back to the last fence,
/// then to the end of the text.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find(FENCE) else {
        return trimmed;
    };

    let mut rest = &trimmed[open + FENCE.len()..];
    if rest.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
        rest = &rest[4..];
    }

    let close = rest
        .match_indices(FENCE)
        .map(|(i, _)| i)
        .filter(|&i| rest[..i].trim_end_matches([' ', '\t']).ends_with('\n'))
        .last()
        .or_else(|| rest.rfind(FENCE));
    match close {
        Some(close) => rest[..close].trim(),
        None => rest.trim(),
    }
}

/// Turns free-form model output into a complete [`StrategyResult`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    limits: NormalizerLimits,
}

impl Normalizer {
    pub fn new(limits: NormalizerLimits) -> Self {
        Self { limits }
    }

    pub fn default_response(&self, ctx: &NormalizeContext) -> StrategyResult {
        defaults::default_response(ctx, &self.limits)
    }

    /// Never fails: anything that cannot be read yields the default response.
    pub fn normalize(&self, raw: &str, ctx: &NormalizeContext) -> StrategyResult {
        match self.try_normalize(raw, ctx) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Model output unusable, serving default response: {e}");
                self.default_response(ctx)
            }
        }
    }

    fn try_normalize(&self, raw: &str, ctx: &NormalizeContext) -> Result<StrategyResult, LabError> {
        // Bare JSON is taken as is; fences are only looked for when that fails.
        let parsed: Value = match serde_json::from_str(raw.trim()) {
            Ok(value) => value,
            Err(_) => serde_json::from_str(strip_code_fence(raw))?,
        };
        if !parsed.is_object() {
            return Err(LabError::ValidationFailed(
                "model output is JSON but not an object".into(),
            ));
        }

        Ok(StrategyResult {
            diagnosis: Diagnosis {
                strengths: self.diagnosis_items(parsed.pointer("/diagnosis/strengths"), &DEFAULT_STRENGTHS),
                weaknesses: self.diagnosis_items(parsed.pointer("/diagnosis/weaknesses"), &DEFAULT_WEAKNESSES),
            },
            strategies: self.strategies(parsed.get("strategies"), ctx),
            weekly_plan: self.weekly_plan(parsed.get("weeklyPlan")),
            hashtags: self.hashtags(parsed.get("hashtags"), ctx),
            keywords: keywords(parsed.get("keywords"), ctx),
            expected_results: expected_results(parsed.get("expectedResults"), ctx),
        })
    }

    fn diagnosis_items(&self, value: Option<&Value>, fallback: &[&str]) -> Vec<String> {
        let items: Vec<String> = value
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(item_title)
                    .take(self.limits.diagnosis_items)
                    .collect()
            })
            .unwrap_or_default();

        if items.is_empty() {
            log::debug!("diagnosis list missing or empty, using defaults");
            fallback.iter().map(|s| s.to_string()).collect()
        } else {
            items
        }
    }

    fn strategies(&self, value: Option<&Value>, ctx: &NormalizeContext) -> Vec<Strategy> {
        let items: Vec<Strategy> = value
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_object)
                    .enumerate()
                    .map(|(i, obj)| coerce_strategy(i, obj))
                    .collect()
            })
            .unwrap_or_default();

        if items.is_empty() {
            log::debug!("strategies missing or empty, using '{}' defaults", ctx.industry);
            defaults::default_strategies(&ctx.industry)
        } else {
            items
        }
    }

    fn weekly_plan(&self, value: Option<&Value>) -> Vec<WeekPlan> {
        let plan = value
            .and_then(Value::as_array)
            .filter(|arr| arr.len() == self.limits.plan_weeks)
            .and_then(|arr| {
                arr.iter()
                    .enumerate()
                    .map(|(i, entry)| coerce_week(i, entry))
                    .collect::<Option<Vec<_>>>()
            });

        plan.unwrap_or_else(|| {
            log::debug!("weeklyPlan unusable, using {}-week template", self.limits.plan_weeks);
            defaults::default_weekly_plan(self.limits.plan_weeks)
        })
    }

    fn hashtags(&self, value: Option<&Value>, ctx: &NormalizeContext) -> Vec<String> {
        let tags: Vec<String> = value
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(non_empty_str).collect())
            .unwrap_or_default();

        if tags.len() >= self.limits.min_hashtags {
            tags.into_iter().take(self.limits.max_hashtags).collect()
        } else {
            log::debug!("only {} hashtags supplied, synthesizing", tags.len());
            defaults::default_hashtags(&ctx.industry, &ctx.district, self.limits.max_hashtags)
        }
    }
}

fn keywords(value: Option<&Value>, ctx: &NormalizeContext) -> Keywords {
    value
        .and_then(|v| serde_json::from_value::<Keywords>(v.clone()).ok())
        .unwrap_or_else(|| {
            log::debug!("keywords unusable, synthesizing");
            defaults::default_keywords(&ctx.industry, &ctx.district)
        })
}

fn expected_results(value: Option<&Value>, ctx: &NormalizeContext) -> ExpectedResults {
    value
        .and_then(|v| serde_json::from_value::<ExpectedResults>(v.clone()).ok())
        .unwrap_or_else(|| {
            log::debug!("expectedResults unusable, computing from monthly sales");
            defaults::expected_results(ctx)
        })
}

fn non_empty_str(v: &Value) -> Option<String> {
    v.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

// Strings and numbers both render fine as text.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        other => non_empty_str(other),
    }
}

fn item_title(v: &Value) -> Option<String> {
    match v {
        Value::Object(obj) => obj.get("title").and_then(non_empty_str),
        other => non_empty_str(other),
    }
}

fn coerce_strategy(index: usize, obj: &Map<String, Value>) -> Strategy {
    let description = text_field(obj, "description")
        .or_else(|| {
            let steps: Vec<String> = obj
                .get("steps")?
                .as_array()?
                .iter()
                .filter_map(non_empty_str)
                .collect();
            (!steps.is_empty()).then(|| steps.join(". "))
        })
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());

    Strategy {
        title: text_field(obj, "title").unwrap_or_else(|| format!("전략 {}", index + 1)),
        description,
        cost: text_field(obj, "cost").unwrap_or_else(|| FALLBACK_COST.to_string()),
        difficulty: text_field(obj, "difficulty").unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
        effect: text_field(obj, "effect")
            .or_else(|| text_field(obj, "expectedEffect"))
            .or_else(|| text_field(obj, "kpi"))
            .unwrap_or_else(|| FALLBACK_EFFECT.to_string()),
    }
}

fn coerce_week(index: usize, entry: &Value) -> Option<WeekPlan> {
    let obj = entry.as_object()?;

    let week = match obj.get("week") {
        Some(Value::Number(n)) => WeekLabel::Number(u32::try_from(n.as_u64()?).ok()?),
        Some(Value::String(s)) if !s.trim().is_empty() => WeekLabel::Label(s.trim().to_string()),
        _ => WeekLabel::Number(index as u32 + 1),
    };

    let days: Vec<String> = obj
        .get("days")?
        .as_array()?
        .iter()
        .filter_map(|d| match d {
            Value::Object(day) => day.get("action").and_then(non_empty_str),
            other => non_empty_str(other),
        })
        .collect();
    if days.is_empty() {
        return None;
    }

    Some(WeekPlan {
        week,
        theme: obj.get("theme").and_then(non_empty_str)?,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_tagged_fence() {
        let raw = "Here you go:\n```json\n{\"a\": 1}\n```\nThanks";
        assert_eq!(strip_code_fence(raw), "{\"a\": 1}");
    }

    #[test]
    fn strips_untagged_and_unclosed_fences() {
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```JSON {\"b\":2}"), "{\"b\":2}");
    }

    #[test]
    fn leaves_plain_text_trimmed() {
        assert_eq!(strip_code_fence("  {\"c\":3}\n"), "{\"c\":3}");
    }

    #[test]
    fn fence_stripping_is_idempotent() {
        let once = strip_code_fence("```json\n{\"d\":4}\n```");
        assert_eq!(strip_code_fence(once), once);
    }

    #[test]
    fn closes_on_fence_at_line_start() {
        let raw = "```json\n{\"t\": \"예시: ```라떼``` 형식\"}\n```\n끝";
        assert_eq!(strip_code_fence(raw), "{\"t\": \"예시: ```라떼``` 형식\"}");
        assert_eq!(strip_code_fence("```{\"u\": 1}```"), "{\"u\": 1}");
    }

    #[test]
    fn strategy_falls_back_field_by_field() {
        let obj = json!({ "steps": ["전단 제작", "배포"], "kpi": "문의 10건", "cost": 50000 });
        let s = coerce_strategy(1, obj.as_object().unwrap());
        assert_eq!(s.title, "전략 2");
        assert_eq!(s.description, "전단 제작. 배포");
        assert_eq!(s.cost, "50000");
        assert_eq!(s.difficulty, "중");
        assert_eq!(s.effect, "문의 10건");
    }

    #[test]
    fn expected_effect_wins_over_kpi() {
        let obj = json!({ "title": "t", "expectedEffect": "매출 10%", "kpi": "k" });
        let s = coerce_strategy(0, obj.as_object().unwrap());
        assert_eq!(s.effect, "매출 10%");
        assert_eq!(s.description, "상세 설명");
    }

    #[test]
    fn week_accepts_range_labels_and_action_objects() {
        let entry = json!({
            "week": "1-2",
            "theme": "기초 정비",
            "days": [{ "day": 1, "action": "플레이스 사진 교체" }, "리뷰 답글"]
        });
        let week = coerce_week(0, &entry).unwrap();
        assert_eq!(week.week, WeekLabel::Label("1-2".into()));
        assert_eq!(week.days, vec!["플레이스 사진 교체", "리뷰 답글"]);
    }

    #[test]
    fn week_without_days_is_rejected() {
        assert!(coerce_week(0, &json!({ "week": 1, "theme": "x", "days": [] })).is_none());
        assert!(coerce_week(0, &json!({ "week": 1, "days": ["a"] })).is_none());
    }

    #[test]
    fn non_object_json_uses_default_response() {
        let n = Normalizer::default();
        let ctx = NormalizeContext::new("카페", "합정동", 1000);
        assert_eq!(n.normalize("[1, 2, 3]", &ctx), n.default_response(&ctx));
    }
}
