use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("API Error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Generation Failed: {0}")]
    GenerationFailed(String),

    #[error("Upstream call timed out after {0}s")]
    Timeout(u64),

    #[error("Validation Failed: {0}")]
    ValidationFailed(String),

    #[error("Config Error: {0}")]
    ConfigError(String),

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
}
