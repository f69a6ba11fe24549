//! Application State
//!
//! Shared state across all handlers.

use parking_lot::RwLock;
use std::sync::Arc;

use emi_assist_agent::{default_catalog, IntentRegistry, Orchestrator};
use emi_assist_config::Settings;
use emi_assist_llm::{ChatCompletionService, OllamaBackend, OllamaDispositionModel};
use emi_assist_tools::create_default_registry;

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Settings>>,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(config: Settings, orchestrator: Orchestrator) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Build the default catalog, handlers and Ollama collaborators from settings
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let registry = IntentRegistry::new(default_catalog(), &config.classifier)?;

        let backend = OllamaBackend::new(config.llm.clone())?;
        let completion = ChatCompletionService::new(Arc::new(backend));
        let summarizer = OllamaDispositionModel::new(config.disposition.clone())?;

        let orchestrator = Orchestrator::new(
            Arc::new(registry),
            config.classifier.clone(),
            &config.session,
            Arc::new(create_default_registry()),
            Arc::new(completion),
            Arc::new(summarizer),
        )?;

        tracing::info!(
            llm = %config.llm.endpoint,
            model = %config.llm.model,
            disposition_model = %config.disposition.model,
            "Collaborators configured"
        );

        Ok(Self::new(config, orchestrator))
    }

    pub fn get_config(&self) -> Settings {
        self.config.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_settings() {
        let state = AppState::from_settings(Settings::default()).unwrap();
        assert_eq!(state.get_config().server.port, 8080);
        assert!(state.orchestrator.session_ids().is_empty());
    }

    #[test]
    fn test_invalid_catalog_settings_rejected() {
        let mut settings = Settings::default();
        settings.classifier.fallback_intent = "nothing".to_string();
        assert!(AppState::from_settings(settings).is_err());
    }
}
