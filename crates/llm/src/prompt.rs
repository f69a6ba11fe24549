//! Prompt building
//!
//! Constructs the instructions sent to the completion service for each turn.

use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Instruction builder for the financial assistant
pub struct PromptBuilder;

impl PromptBuilder {
    /// Instruction for an in-domain intent
    ///
    /// Embeds the retrieved data verbatim and restricts the answer to it.
    pub fn grounded(intent: &str, retrieved_data: &Value) -> String {
        let data = serde_json::to_string_pretty(retrieved_data)
            .unwrap_or_else(|_| retrieved_data.to_string());

        format!(
            r#"You are a helpful financial assistant LLM. Follow these rules strictly:

1) Use ONLY the structured information in `retrieved_data` below to answer user queries.
2) If user asks something outside available data, politely say you don't have that info.
3) For chit-chat, gently bring the conversation back to loans, EMI, or profile.
4) If user requests a human, acknowledge and suggest next steps.

CURRENT_INTENT: {intent}
retrieved_data (JSON):
{data}"#
        )
    }

    /// Instruction for the fallback intent
    ///
    /// Allows one factual off-domain sentence, then forces a redirect.
    pub fn off_domain() -> String {
        r#"You are a helpful financial assistant LLM.

Rules for off-domain queries:
1) If the user asks anything outside financial/payment context, answer in ONE factual sentence if possible.
2) After answering, immediately bring the conversation back to loans, EMI, or payments.
3) Keep your response polite, concise, and professional.
4) Do not use any structured data for off-domain queries.

Respond in plain text."#
            .to_string()
    }

    /// Prompt for the disposition model
    pub fn disposition(intents: &[String]) -> String {
        let list = serde_json::to_string_pretty(intents).unwrap_or_else(|_| "[]".to_string());
        format!("Given these intents, predict final disposition:\n{}", list)
    }
}
