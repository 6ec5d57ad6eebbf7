use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnosis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Strategy {
    pub title: String,
    pub description: String,
    #[schemars(description = "Estimated cost, e.g. '5만원'.")]
    pub cost: String,
    #[schemars(description = "One of 상, 중, 하.")]
    pub difficulty: String,
    pub effect: String,
}

/// Generated plans number their weeks; upstream plans sometimes use ranges like "1-2".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum WeekLabel {
    Number(u32),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeekPlan {
    pub week: WeekLabel,
    pub theme: String,
    pub days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Keywords {
    pub naver: Vec<String>,
    pub kakao: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Figures {
    pub sales: u64,
    pub profit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Increase {
    pub sales: u64,
    pub profit: u64,
    pub sales_percent: u32,
    pub profit_percent: u32,
}

/// Monetary amounts are in KRW.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpectedResults {
    pub current: Figures,
    pub after: Figures,
    pub increase: Increase,
    pub roi: f64,
    pub period: String,
}

/// The payload the result page renders. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    pub diagnosis: Diagnosis,
    pub strategies: Vec<Strategy>,
    pub weekly_plan: Vec<WeekPlan>,
    pub hashtags: Vec<String>,
    pub keywords: Keywords,
    pub expected_results: ExpectedResults,
}
