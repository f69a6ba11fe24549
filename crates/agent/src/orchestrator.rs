//! Session Orchestrator
//!
//! Drives one user turn from raw text to reply:
//!
//! ```text
//! text ─► end phrase? ─yes─► close session ─► summarize intents ─► terminal reply
//!           │no
//!           ▼
//!        classify ─► record turn ─► retrieve data ─► build instruction ─► complete
//! ```

use serde_json::{json, Value};
use std::sync::Arc;

use emi_assist_config::{ClassifierConfig, SessionConfig};
use emi_assist_core::{CompletionService, DispositionSummarizer, TurnRecord, TurnReply};
use emi_assist_llm::PromptBuilder;
use emi_assist_tools::HandlerRegistry;

use crate::catalog::IntentRegistry;
use crate::intent::{Classification, IntentClassifier};
use crate::session::{ResolvedConfirmation, SessionState, SessionStore};
use crate::AgentError;

/// Turn-level coordinator shared by all sessions
pub struct Orchestrator {
    classifier: IntentClassifier,
    handlers: Arc<HandlerRegistry>,
    completion: Arc<dyn CompletionService>,
    summarizer: Arc<dyn DispositionSummarizer>,
    sessions: SessionStore,
    end_phrases: Vec<String>,
}

impl Orchestrator {
    /// Wire the orchestrator, checking that every intent's handler is registered
    pub fn new(
        registry: Arc<IntentRegistry>,
        classifier_config: ClassifierConfig,
        session_config: &SessionConfig,
        handlers: Arc<HandlerRegistry>,
        completion: Arc<dyn CompletionService>,
        summarizer: Arc<dyn DispositionSummarizer>,
    ) -> Result<Self, AgentError> {
        classifier_config.validate()?;
        session_config.validate()?;

        if let Some(missing) = registry.handler_names().into_iter().find(|h| !handlers.has(h)) {
            return Err(AgentError::Registry(format!("Handler '{}' is not registered", missing)));
        }

        let end_phrases = session_config
            .end_phrases
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        tracing::info!(
            intents = registry.len(),
            handlers = handlers.len(),
            model = %completion.model_name(),
            "Orchestrator ready"
        );

        Ok(Self {
            classifier: IntentClassifier::new(registry, classifier_config),
            handlers,
            completion,
            summarizer,
            sessions: SessionStore::new(),
            end_phrases,
        })
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Whether the completion model can be reached
    pub async fn completion_available(&self) -> bool {
        self.completion.is_available().await
    }

    /// Whether the text ends a session (trimmed, case-insensitive, exact match)
    pub fn is_end_phrase(&self, text: &str) -> bool {
        let candidate = text.trim().to_lowercase();
        self.end_phrases.iter().any(|p| *p == candidate)
    }

    /// Process one user turn
    pub async fn process_turn(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<TurnReply, AgentError> {
        if self.is_end_phrase(text) {
            return Ok(self.end_session(session_id).await);
        }

        let classification = self.classifier.classify(text);
        let role = self.classifier.registry().confirmation_role(&classification.chosen_intent);
        let mut record = TurnRecord::new(
            text,
            classification.chosen_intent.clone(),
            classification.confidence,
            classification.handler.clone(),
        );

        // The slot lock covers only the append; a slot ended meanwhile is retried fresh
        let resolved = loop {
            let slot = self.sessions.slot(session_id);
            match slot.record(record, role) {
                Ok(resolved) => break resolved,
                Err(returned) => {
                    record = returned;
                    tokio::task::yield_now().await;
                }
            }
        };

        tracing::info!(
            session_id = %session_id,
            intent = %classification.chosen_intent,
            confidence = classification.confidence,
            "Turn classified"
        );

        let instruction = self.instruction(&classification, text, resolved).await?;
        let reply = self.completion.complete(&instruction, text, session_id).await;

        Ok(TurnReply::in_progress(reply, classification.chosen_intent))
    }

    async fn instruction(
        &self,
        classification: &Classification,
        text: &str,
        resolved: Option<ResolvedConfirmation>,
    ) -> Result<String, AgentError> {
        if classification.is_fallback()
            || classification.chosen_intent == self.classifier.config().fallback_intent
        {
            return Ok(PromptBuilder::off_domain());
        }

        let mut data = self.handlers.retrieve(&classification.handler, text).await?;
        if let Some(resolved) = resolved {
            tracing::debug!(
                pending_action = %resolved.pending_action,
                confirmed = resolved.confirmed,
                "Confirmation resolved"
            );
            data = with_confirmation(data, resolved);
        }

        Ok(PromptBuilder::grounded(&classification.chosen_intent, &data))
    }

    /// End a session and summarize it
    ///
    /// Unknown sessions summarize an empty intent list.
    pub async fn end_session(&self, session_id: &str) -> TurnReply {
        let intents = self.close_session(session_id).await;
        let disposition = self.summarizer.summarize(&intents).await;
        self.completion.forget(session_id).await;

        tracing::info!(
            session_id = %session_id,
            turns = intents.len(),
            disposition = %disposition,
            "Session ended"
        );

        TurnReply::ended(disposition)
    }

    async fn close_session(&self, session_id: &str) -> Vec<String> {
        loop {
            let Some(slot) = self.sessions.get(session_id) else {
                return Vec::new();
            };
            if let Some(state) = self.sessions.close(session_id, &slot) {
                return state.intents();
            }
            // Closed by a concurrent end; look again once it has left the store
            tokio::task::yield_now().await;
        }
    }

    /// Read-only copy of a live session
    pub fn session_snapshot(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.snapshot(session_id)
    }

    /// Live session ids, sorted
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.ids()
    }
}

fn with_confirmation(data: Value, resolved: ResolvedConfirmation) -> Value {
    match data {
        Value::Object(mut map) => {
            map.insert("pending_action".to_string(), Value::String(resolved.pending_action));
            map.insert("confirmed".to_string(), Value::Bool(resolved.confirmed));
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "pending_action": resolved.pending_action,
            "confirmed": resolved.confirmed,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_extends_object() {
        let data = json!({ "status": "success" });
        let extended = with_confirmation(
            data,
            ResolvedConfirmation {
                pending_action: "not_willing_to_pay".to_string(),
                confirmed: true,
            },
        );
        assert_eq!(extended["status"], "success");
        assert_eq!(extended["pending_action"], "not_willing_to_pay");
        assert_eq!(extended["confirmed"], true);
    }

    #[test]
    fn test_confirmation_wraps_non_object() {
        let extended = with_confirmation(
            json!("registered"),
            ResolvedConfirmation {
                pending_action: "not_willing_to_pay".to_string(),
                confirmed: false,
            },
        );
        assert_eq!(extended["data"], "registered");
        assert_eq!(extended["confirmed"], false);
    }
}
