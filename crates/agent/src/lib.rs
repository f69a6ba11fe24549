//! Intent classification and session orchestration
//!
//! Features:
//! - Per-intent TF-IDF similarity with cached example spaces
//! - Weighted intent scoring with threshold and ambiguity policy
//! - Priority keyword override
//! - Per-session turn ordering and a pending-confirmation flag
//! - Disposition summary when a session ends

pub mod similarity;
pub mod catalog;
pub mod intent;
pub mod session;
pub mod orchestrator;

pub use similarity::{similarity_scores, ExampleSpace};
pub use catalog::{default_catalog, ConfirmationRole, IntentDefinition, IntentRegistry};
pub use intent::{Classification, Decision, IntentClassifier, ScoredCandidate};
pub use session::{SessionState, SessionStore};
pub use orchestrator::Orchestrator;

use emi_assist_core::HandlerError;
use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl From<emi_assist_config::ConfigError> for AgentError {
    fn from(err: emi_assist_config::ConfigError) -> Self {
        AgentError::Config(err.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: AgentError = HandlerError::NotFound("get_weather".to_string()).into();
        assert_eq!(err.to_string(), "Handler not found: get_weather");

        let err = AgentError::Registry("duplicate".to_string());
        assert_eq!(err.to_string(), "Registry error: duplicate");
    }
}
