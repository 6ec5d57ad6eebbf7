use dotenv::dotenv;
use marketing_lab::ai::client::GeminiClient;
use marketing_lab::ai::prompts::PromptBuilder;
use marketing_lab::browser::entitlement::SharedCodeEntitlement;
use marketing_lab::config::{Config, FormLimits, NormalizerLimits};
use marketing_lab::core::normalizer::Normalizer;
use marketing_lab::orchestrator::Orchestrator;
use marketing_lab::server::{self, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::builder().filter_level(log::LevelFilter::Info).init();

    let config = Config::from_env()?;

    println!("🤖 MARKETING LAB STRATEGY SERVER");
    log::info!(
        "Model: {}, prompt: {:?}, upstream timeout: {:?}",
        config.model,
        config.prompt_version,
        config.upstream_timeout
    );

    let generator = GeminiClient::from_config(&config)?;
    let orchestrator = Orchestrator::new(
        Arc::new(generator),
        PromptBuilder::new(config.prompt_version, FormLimits::default()),
        Normalizer::new(NormalizerLimits::default()),
        config.upstream_timeout,
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        entitlement: Arc::new(SharedCodeEntitlement::new(&config.unlock_code)),
    };

    server::serve(&config.bind_addr, state).await?;
    Ok(())
}
