//! Session-scoped chat completion
//!
//! Keeps one running message log per session. Each call sends the turn's
//! instruction as the system message followed by the whole log, then
//! appends the reply (or the error marker) to the log.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::RwLock;

use emi_assist_core::CompletionService;

use crate::backend::LlmBackend;
use crate::prompt::Message;

/// Prefix of replies produced when the backend call fails
pub const LLM_ERROR_MARKER: &str = "[LLM ERROR]";

/// Completion service over any [`LlmBackend`]
pub struct ChatCompletionService {
    backend: Arc<dyn LlmBackend>,
    history: RwLock<HashMap<String, Vec<Message>>>,
}

impl ChatCompletionService {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            history: RwLock::new(HashMap::new()),
        }
    }

    /// Copy of the message log for a session
    #[cfg(test)]
    fn history(&self, session_id: &str) -> Vec<Message> {
        self.history.read().get(session_id).cloned().unwrap_or_default()
    }

    /// Number of sessions with a message log
    #[cfg(test)]
    fn session_count(&self) -> usize {
        self.history.read().len()
    }
}

#[async_trait]
impl CompletionService for ChatCompletionService {
    async fn complete(&self, instruction: &str, user_text: &str, session_id: &str) -> String {
        let messages = {
            let mut history = self.history.write();
            let log = history.entry(session_id.to_string()).or_default();
            log.push(Message::user(user_text));

            let mut messages = Vec::with_capacity(log.len() + 1);
            messages.push(Message::system(instruction));
            messages.extend(log.iter().cloned());
            messages
        };

        let reply = match self.backend.generate(&messages).await {
            Ok(result) => {
                tracing::debug!(
                    session_id = %session_id,
                    model = %self.backend.model_name(),
                    tokens = result.tokens,
                    total_time_ms = result.total_time_ms,
                    "Completion generated"
                );
                result.text
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Completion failed");
                format!("{} {}", LLM_ERROR_MARKER, e)
            }
        };

        self.history
            .write()
            .entry(session_id.to_string())
            .or_default()
            .push(Message::assistant(reply.clone()));

        reply
    }

    async fn forget(&self, session_id: &str) {
        if self.history.write().remove(session_id).is_some() {
            tracing::debug!(session_id = %session_id, "Dropped completion history");
        }
    }

    async fn is_available(&self) -> bool {
        self.backend.is_available().await
    }

    fn model_name(&self) -> &str {
        self.backend.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GenerationResult;
    use crate::prompt::Role;
    use crate::LlmError;
    use parking_lot::Mutex;

    /// Echoes the last user message and records what it was sent
    struct EchoBackend {
        seen: Mutex<Vec<Vec<Message>>>,
    }

    #[async_trait]
    impl LlmBackend for EchoBackend {
        async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
            self.seen.lock().push(messages.to_vec());
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(GenerationResult {
                text: format!("echo: {}", last),
                tokens: 2,
                total_time_ms: 1,
            })
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    struct DownBackend;

    #[async_trait]
    impl LlmBackend for DownBackend {
        async fn generate(&self, _messages: &[Message]) -> Result<GenerationResult, LlmError> {
            Err(LlmError::Network("connection refused".to_string()))
        }

        async fn is_available(&self) -> bool {
            false
        }

        fn model_name(&self) -> &str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_history_accumulates_per_session() {
        let backend = Arc::new(EchoBackend { seen: Mutex::new(Vec::new()) });
        let service = ChatCompletionService::new(backend.clone());

        let first = service.complete("rules A", "Loan details", "s1").await;
        assert_eq!(first, "echo: Loan details");
        service.complete("rules B", "Show EMI split", "s1").await;
        service.complete("rules C", "hello", "s2").await;

        let s1 = service.history("s1");
        assert_eq!(s1.len(), 4);
        assert_eq!(s1[0], Message::user("Loan details"));
        assert_eq!(s1[1].role, Role::Assistant);

        // Second call carries the fresh instruction plus the prior exchange
        let seen = backend.seen.lock();
        assert_eq!(seen[1][0], Message::system("rules B"));
        assert_eq!(seen[1].len(), 4);
        assert_eq!(service.session_count(), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_error_marker() {
        let service = ChatCompletionService::new(Arc::new(DownBackend));
        let reply = service.complete("rules", "Show EMI split", "s1").await;

        assert!(reply.starts_with(LLM_ERROR_MARKER));
        assert!(reply.contains("connection refused"));
        assert_eq!(service.history("s1").len(), 2);
    }

    #[tokio::test]
    async fn test_availability_follows_backend() {
        let echo = EchoBackend { seen: Mutex::new(Vec::new()) };
        let up = ChatCompletionService::new(Arc::new(echo));
        let down = ChatCompletionService::new(Arc::new(DownBackend));
        assert!(up.is_available().await);
        assert!(!down.is_available().await);
    }

    #[tokio::test]
    async fn test_forget_drops_session_log() {
        let backend = Arc::new(EchoBackend { seen: Mutex::new(Vec::new()) });
        let service = ChatCompletionService::new(backend);
        service.complete("rules", "Loan details", "s1").await;

        service.forget("s1").await;
        assert!(service.history("s1").is_empty());
        assert_eq!(service.session_count(), 0);
    }
}
