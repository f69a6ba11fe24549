//! Collaborator traits
//!
//! The orchestrator talks to everything outside the classification core
//! through these traits, which keeps the backends swappable and mockable.
//!
//! ```text
//! Language models:
//!   - CompletionService: instruction + user text -> reply (keeps its own session log)
//!   - DispositionSummarizer: ordered intent names -> disposition label
//!
//! Retrieval:
//!   - RetrievalHandler: user text -> structured data for one intent
//! ```

mod llm;
mod retriever;

pub use llm::{CompletionService, DispositionSummarizer};
pub use retriever::RetrievalHandler;
