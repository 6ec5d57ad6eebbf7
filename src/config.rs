use crate::ai::prompts::PromptVersion;
use crate::error::LabError;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Placeholder for the shared unlock code until real entitlements exist.
pub const DEFAULT_UNLOCK_CODE: &str = "12345";
pub const APP_ID: &str = "marketinglab";

const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "GOOGLE_AISTUDIO_KEY"];

/// Thresholds applied while coercing upstream output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerLimits {
    pub diagnosis_items: usize,
    pub min_hashtags: usize,
    pub max_hashtags: usize,
    pub plan_weeks: usize,
}

impl Default for NormalizerLimits {
    fn default() -> Self {
        Self {
            diagnosis_items: 3,
            min_hashtags: 10,
            max_hashtags: 15,
            plan_weeks: 12,
        }
    }
}

/// Caps on repeated form sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLimits {
    pub top_services: usize,
    pub faqs: usize,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            top_services: 3,
            faqs: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub bind_addr: String,
    pub prompt_version: PromptVersion,
    pub upstream_timeout: Duration,
    pub unlock_code: String,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, LabError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, LabError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|key| non_empty(*key))
            .ok_or_else(|| {
                LabError::ConfigError(format!("one of {} must be set", API_KEY_VARS.join(", ")))
            })?;

        let prompt_version = match non_empty("PROMPT_VERSION") {
            Some(v) => v.parse()?,
            None => PromptVersion::default(),
        };

        let timeout_secs = match non_empty("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|e| {
                LabError::ConfigError(format!("UPSTREAM_TIMEOUT_SECS '{v}': {e}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(LabError::ConfigError("UPSTREAM_TIMEOUT_SECS must be positive".into()));
        }

        Ok(Self {
            api_key,
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: non_empty("GEMINI_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            prompt_version,
            upstream_timeout: Duration::from_secs(timeout_secs),
            unlock_code: non_empty("UNLOCK_CODE").unwrap_or_else(|| DEFAULT_UNLOCK_CODE.to_string()),
        })
    }
}
