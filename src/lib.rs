pub mod config;
pub mod error;
pub mod core {
    pub mod defaults;
    pub mod form;
    pub mod normalizer;
    pub mod result;
}
pub mod ai {
    pub mod client;
    pub mod prompts;
    pub mod schema_utils;
}
pub mod browser {
    pub mod calendar;
    pub mod entitlement;
    pub mod progress;
    pub mod store;
}
pub mod orchestrator;
pub mod server;
