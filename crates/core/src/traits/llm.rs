//! Language model collaborator traits

use async_trait::async_trait;

/// Text completion interface
///
/// Implementations keep their own per-session message log and append to it
/// on every call. Failures never surface as errors: they come back as a
/// reply string starting with an error marker so a turn always completes.
///
/// # Example
///
/// ```ignore
/// let reply = completion
///     .complete("Answer only from retrieved_data", "When is my EMI due?", "s1")
///     .await;
/// ```
#[async_trait]
pub trait CompletionService: Send + Sync + 'static {
    /// Generate a reply for `user_text` under `instruction`, scoped to `session_id`
    async fn complete(&self, instruction: &str, user_text: &str, session_id: &str) -> String;

    /// Drop any message log kept for `session_id`
    async fn forget(&self, _session_id: &str) {}

    /// Whether the backing model can be reached
    async fn is_available(&self) -> bool {
        true
    }

    /// Model name for logging
    fn model_name(&self) -> &str;
}

/// Disposition summarization interface
///
/// Maps the ordered intent names of a finished conversation to a single
/// label. Transport failures are returned as a string starting with an
/// error marker.
#[async_trait]
pub trait DispositionSummarizer: Send + Sync + 'static {
    async fn summarize(&self, intents: &[String]) -> String;
}
