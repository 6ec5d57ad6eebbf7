use crate::config::Config;
use crate::error::LabError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// A text-generation backend: one prompt in, free text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, response_schema: Option<Value>) -> Result<String, LabError>;

    fn model(&self) -> &str;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, api_base: &str, model: &str, timeout: Duration) -> Result<Self, LabError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LabError> {
        Self::new(&config.api_key, &config.api_base, &config.model, config.upstream_timeout)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, response_schema: Option<Value>) -> Result<String, LabError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);

        let mut payload = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        if let Some(schema) = response_schema {
            payload["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema
            });
        }

        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let err_text = res.text().await.unwrap_or_default();
            log::error!("Gemini API Error {status}: {err_text}");
            return Err(LabError::GenerationFailed(format!("API Error {status}: {err_text}")));
        }

        let body: Value = res.json().await?;

        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                let reason = body["candidates"][0]["finishReason"]
                    .as_str()
                    .or_else(|| body["promptFeedback"]["blockReason"].as_str())
                    .unwrap_or("unknown");
                LabError::GenerationFailed(format!("No text content returned (reason: {reason})"))
            })?;

        log::debug!("Gemini returned {} chars", text.len());
        Ok(text.to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
