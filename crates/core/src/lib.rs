//! Core traits and types for the EMI support assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Collaborator traits (completion service, disposition summarizer, retrieval handlers)
//! - Conversation types (turn records, turn replies)
//! - Handler error type

pub mod error;
pub mod conversation;
pub mod traits;

pub use error::HandlerError;
pub use conversation::{TurnRecord, TurnReply, END_CONVERSATION_INTENT, IN_PROGRESS};

pub use traits::{CompletionService, DispositionSummarizer, RetrievalHandler};
