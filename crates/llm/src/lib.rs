//! Language model collaborators
//!
//! Features:
//! - Ollama chat backend with retry on transient failures
//! - Grounded and off-domain instruction building
//! - Session-scoped completion service with its own message log
//! - Disposition model client

pub mod backend;
pub mod prompt;
pub mod completion;
pub mod disposition;

pub use backend::{LlmBackend, OllamaBackend, GenerationResult};
pub use prompt::{PromptBuilder, Message, Role};
pub use completion::{ChatCompletionService, LLM_ERROR_MARKER};
pub use disposition::{OllamaDispositionModel, DISPOSITION_ERROR_MARKER};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
