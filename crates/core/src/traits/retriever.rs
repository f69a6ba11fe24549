//! Retrieval handler trait

use async_trait::async_trait;
use serde_json::Value;

use crate::HandlerError;

/// Data retrieval for a single intent
///
/// Every handler takes the raw user text, whether or not it uses it, so
/// dispatch never has to probe for a different call shape.
#[async_trait]
pub trait RetrievalHandler: Send + Sync {
    /// Handler name used for registry lookup
    fn name(&self) -> &str;

    /// Fetch structured (JSON-serializable) data for this intent
    async fn retrieve(&self, text: &str) -> Result<Value, HandlerError>;
}
