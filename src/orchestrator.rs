use crate::ai::client::TextGenerator;
use crate::ai::prompts::PromptBuilder;
use crate::ai::schema_utils;
use crate::core::form::FormInput;
use crate::core::normalizer::Normalizer;
use crate::core::result::StrategyResult;
use crate::error::LabError;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Runs one submission through prompt building, generation and normalization.
pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
    normalizer: Normalizer,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        prompts: PromptBuilder,
        normalizer: Normalizer,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            prompts,
            normalizer,
            timeout,
        }
    }

    pub async fn build_strategy(&self, form: &FormInput) -> Result<StrategyResult, LabError> {
        let request_id = Uuid::new_v4();
        log::info!("[{request_id}] 📝 Strategy request: {} ({}, {})", form.store_name, form.industry, form.district);

        form.validate()?;

        let prompt = self.prompts.build(form);
        let schema = if self.prompts.version().uses_response_schema() {
            Some(schema_utils::response_schema::<StrategyResult>()?)
        } else {
            None
        };
        log::info!(
            "[{request_id}] 🏗️  Prompt built ({:?}, {} chars), calling {}",
            self.prompts.version(),
            prompt.chars().count(),
            self.generator.model()
        );

        let raw = match tokio::time::timeout(self.timeout, self.generator.generate(&prompt, schema)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                log::error!("[{request_id}] ❌ Generation failed: {e}");
                return Err(e);
            }
            Err(_) => {
                log::error!("[{request_id}] ❌ Generation timed out after {:?}", self.timeout);
                return Err(LabError::Timeout(self.timeout.as_secs()));
            }
        };
        log::info!("[{request_id}]    -> Received {} chars", raw.chars().count());

        let result = self.normalizer.normalize(&raw, &form.context());
        log::info!(
            "[{request_id}] ✅ Strategy ready: {} strategies, {} weeks, {} hashtags",
            result.strategies.len(),
            result.weekly_plan.len(),
            result.hashtags.len()
        );
        Ok(result)
    }
}
