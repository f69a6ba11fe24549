//! Handler Registry
//!
//! Maps handler names to retrieval handlers and dispatches by name.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use emi_assist_core::{HandlerError, RetrievalHandler};

/// Handler that always returns the same payload
#[derive(Debug, Clone)]
pub struct StaticHandler {
    name: String,
    payload: Value,
}

impl StaticHandler {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

#[async_trait]
impl RetrievalHandler for StaticHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn retrieve(&self, _text: &str) -> Result<Value, HandlerError> {
        Ok(self.payload.clone())
    }
}

/// Handler registry
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn RetrievalHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under its own name, replacing any previous one
    pub fn register<H: RetrievalHandler + 'static>(&mut self, handler: H) {
        let name = handler.name().to_string();
        self.handlers.insert(name, Arc::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn RetrievalHandler>> {
        self.handlers.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered handler names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run the named handler against the user text
    pub async fn retrieve(&self, name: &str, text: &str) -> Result<Value, HandlerError> {
        let handler = self
            .get(name)
            .ok_or_else(|| HandlerError::NotFound(name.to_string()))?;

        tracing::trace!(handler = name, "Running retrieval handler");
        handler.retrieve(text).await
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Broken;

    #[async_trait]
    impl RetrievalHandler for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn retrieve(&self, _text: &str) -> Result<Value, HandlerError> {
            Err(HandlerError::execution("broken", "datastore offline"))
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_name() {
        let mut registry = HandlerRegistry::new();
        registry.register(StaticHandler::new("get_emi_breakdown", json!({ "emi_amount": 35500 })));

        let data = registry.retrieve("get_emi_breakdown", "Show EMI split").await.unwrap();
        assert_eq!(data["emi_amount"], 35500);
        assert!(registry.has("get_emi_breakdown"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_handler() {
        let registry = HandlerRegistry::new();
        let err = registry.retrieve("missing", "hi").await.unwrap_err();
        assert_eq!(err, HandlerError::NotFound("missing".to_string()));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_handler_failure_is_returned() {
        let mut registry = HandlerRegistry::new();
        registry.register(Broken);

        let err = registry.retrieve("broken", "Loan details").await.unwrap_err();
        assert!(matches!(err, HandlerError::Execution { .. }));
    }

    #[tokio::test]
    async fn test_register_replaces_same_name() {
        let mut registry = HandlerRegistry::new();
        registry.register(StaticHandler::new("get_other", json!({ "v": 1 })));
        registry.register(StaticHandler::new("get_other", json!({ "v": 2 })));
        assert_eq!(registry.names(), vec!["get_other".to_string()]);

        let data = registry.retrieve("get_other", "anything").await.unwrap();
        assert_eq!(data["v"], 2);
    }
}
