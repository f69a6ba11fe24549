//! Conversation types: turn records and turn replies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Disposition reported for every turn that does not end the session
pub const IN_PROGRESS: &str = "in_progress";

/// Intent reported on the terminal turn of a session
pub const END_CONVERSATION_INTENT: &str = "end_conversation";

/// A single classified user turn
///
/// Appended to the session once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Raw user text
    pub text: String,
    /// Intent chosen by the classifier
    pub chosen_intent: String,
    /// Top candidate's final score
    pub confidence: f64,
    /// Name of the retrieval handler bound to the chosen intent
    pub handler: String,
    /// When the turn was recorded
    pub at: DateTime<Utc>,
}

impl TurnRecord {
    pub fn new(
        text: impl Into<String>,
        chosen_intent: impl Into<String>,
        confidence: f64,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            chosen_intent: chosen_intent.into(),
            confidence,
            handler: handler.into(),
            at: Utc::now(),
        }
    }
}

/// Reply returned for every processed turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    pub reply: String,
    pub intent: String,
    pub disposition: String,
}

impl TurnReply {
    /// Reply for an ongoing turn
    pub fn in_progress(reply: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            intent: intent.into(),
            disposition: IN_PROGRESS.to_string(),
        }
    }

    /// Reply for the turn that ends the session
    pub fn ended(disposition: impl Into<String>) -> Self {
        let disposition = disposition.into();
        Self {
            reply: format!("Conversation ended. Final disposition: {}", disposition),
            intent: END_CONVERSATION_INTENT.to_string(),
            disposition,
        }
    }

    /// Whether this reply closed the session
    pub fn is_terminal(&self) -> bool {
        self.intent == END_CONVERSATION_INTENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ended_reply_embeds_disposition() {
        let reply = TurnReply::ended("promise_to_pay");
        assert_eq!(reply.reply, "Conversation ended. Final disposition: promise_to_pay");
        assert_eq!(reply.intent, END_CONVERSATION_INTENT);
        assert_eq!(reply.disposition, "promise_to_pay");
        assert!(reply.is_terminal());
    }

    #[test]
    fn test_in_progress_reply() {
        let reply = TurnReply::in_progress("Your EMI is due on the 5th.", "emi_breakdown");
        assert_eq!(reply.disposition, IN_PROGRESS);
        assert!(!reply.is_terminal());
    }

    #[test]
    fn test_turn_record_serializes() {
        let record = TurnRecord::new("Loan details", "loan_balance", 0.81, "loan_details");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["chosen_intent"], "loan_balance");
        assert_eq!(json["handler"], "loan_details");
    }
}
