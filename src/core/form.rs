use crate::error::LabError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapo-gu neighbourhoods offered by the form.
pub const MAPO_DISTRICTS: [&str; 15] = [
    "공덕동", "아현동", "도화동", "용강동", "대흥동",
    "염리동", "신수동", "서강동", "서교동", "합정동",
    "망원동", "연남동", "성산동", "중동", "상암동",
];

/// Monthly figures on the form are entered in units of 10,000 KRW.
pub const SALES_UNIT_KRW: u64 = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceItem {
    pub name: String,
    pub price: u64,
    pub is_hit: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Competitor {
    pub name: String,
    pub feature: String,
    pub price: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewStat {
    pub count: u64,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnsProfile {
    pub followers: u64,
    /// Posts per week.
    pub frequency: u64,
    pub hashtags: String,
    pub no_hashtags: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaySchedule {
    pub idle: TimeWindow,
    pub busy: TimeWindow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSchedule {
    pub weekday: DaySchedule,
    pub weekend: DaySchedule,
}

/// One questionnaire submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormInput {
    pub industry: String,
    pub store_name: String,
    pub district: String,
    pub monthly_sales: u64,
    pub real_profit: Option<u64>,
    pub platforms: Vec<String>,
    pub has_hit_product: bool,
    pub hit_product_name: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    #[serde(alias = "concern")]
    pub concerns: Vec<String>,
    #[serde(alias = "strength")]
    pub unique_strength: String,
    pub top_services: Vec<ServiceItem>,
    pub competitors: Vec<Competitor>,
    pub faqs: Vec<String>,
    pub booking_methods: Vec<String>,
    pub payment_methods: Vec<String>,
    pub reviews: BTreeMap<String, ReviewStat>,
    pub sns_info: Option<SnsProfile>,
    pub time_schedule: Option<TimeSchedule>,
    pub industry_specific: BTreeMap<String, String>,
}

/// The slice of a submission the normalizer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeContext {
    pub industry: String,
    pub district: String,
    pub monthly_sales: u64,
    pub real_profit: Option<u64>,
}

impl NormalizeContext {
    pub fn new(industry: &str, district: &str, monthly_sales: u64) -> Self {
        Self {
            industry: industry.to_string(),
            district: district.to_string(),
            monthly_sales,
            real_profit: None,
        }
    }

    pub fn with_real_profit(mut self, real_profit: u64) -> Self {
        self.real_profit = Some(real_profit);
        self
    }
}

impl FormInput {
    /// Presence checks only; free text is passed through untouched.
    pub fn validate(&self) -> Result<(), LabError> {
        let mut missing = Vec::new();
        if self.industry.trim().is_empty() {
            missing.push("industry");
        }
        if self.store_name.trim().is_empty() {
            missing.push("storeName");
        }
        if self.district.trim().is_empty() {
            missing.push("district");
        }
        if !missing.is_empty() {
            return Err(LabError::ValidationFailed(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        if !MAPO_DISTRICTS.contains(&self.district.trim()) {
            return Err(LabError::ValidationFailed(format!(
                "unknown district '{}'",
                self.district
            )));
        }
        if self.monthly_sales == 0 {
            return Err(LabError::ValidationFailed("monthlySales must be positive".into()));
        }
        Ok(())
    }

    pub fn context(&self) -> NormalizeContext {
        NormalizeContext {
            industry: self.industry.trim().to_string(),
            district: self.district.trim().to_string(),
            monthly_sales: self.monthly_sales,
            real_profit: self.real_profit,
        }
    }

    pub fn is_offline_only(&self) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == "none")
    }
}

// The older form posted a single `concern` string.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.trim().is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}
