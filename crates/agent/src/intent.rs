//! Intent Classification
//!
//! Ranks every registered intent for a user utterance and applies the
//! confidence and ambiguity policy.
//!
//! Per intent:
//! - `max`: best TF-IDF cosine against the intent's examples
//! - `avg`: mean of those similarities
//! - `keyword`: share of the intent's keywords found as substrings
//! - `final = max_weight * max + avg_weight * avg + keyword_weight * keyword`
//!
//! The top candidate is accepted when it clears either similarity threshold
//! and leads the runner-up by at least the ambiguity delta. Anything else
//! resolves to the fallback intent.

use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

use emi_assist_config::ClassifierConfig;

use crate::catalog::{IntentRegistry, RegisteredIntent};
use crate::similarity::{max_score, mean_score, normalize};

/// Scores of one intent for one utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub intent: String,
    pub max_example_score: f64,
    pub avg_example_score: f64,
    pub keyword_score: f64,
    pub final_score: f64,
}

/// How the chosen intent was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// A priority keyword matched; nothing was scored
    PriorityKeyword,
    Accepted,
    /// Top two candidates were too close
    Ambiguous,
    /// Top candidate cleared neither threshold
    BelowThreshold,
}

/// Classifier output
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub chosen_intent: String,
    /// Final score of the top-ranked candidate, even when the fallback was chosen
    pub confidence: f64,
    /// Handler bound to the chosen intent
    pub handler: String,
    pub decision: Decision,
    /// All candidates, best first; empty on a priority keyword match
    pub candidates: Vec<ScoredCandidate>,
}

impl Classification {
    pub fn is_fallback(&self) -> bool {
        matches!(self.decision, Decision::Ambiguous | Decision::BelowThreshold)
    }
}

/// Lexical intent classifier
pub struct IntentClassifier {
    registry: Arc<IntentRegistry>,
    config: ClassifierConfig,
}

impl IntentClassifier {
    pub fn new(registry: Arc<IntentRegistry>, config: ClassifierConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<IntentRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify an utterance
    ///
    /// Deterministic: the same text against the same registry always yields
    /// the same result.
    pub fn classify(&self, text: &str) -> Classification {
        let normalized = normalize(text);
        tracing::debug!(input = %normalized, "Classifying utterance");

        let priority = self.registry.priority();
        if let Some(keyword) = priority
            .definition
            .keywords
            .iter()
            .find(|kw| normalized.contains(kw.as_str()))
        {
            tracing::debug!(
                intent = %priority.name(),
                keyword = %keyword,
                "Priority keyword matched"
            );
            return Classification {
                chosen_intent: priority.name().to_string(),
                confidence: 1.0,
                handler: priority.handler().to_string(),
                decision: Decision::PriorityKeyword,
                candidates: Vec::new(),
            };
        }

        let mut candidates: Vec<ScoredCandidate> = self
            .registry
            .iter()
            .map(|intent| self.score(intent, &normalized))
            .collect();

        // Stable, so registration order decides exact ties
        candidates.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });

        let top = &candidates[0];
        let second_score = candidates.get(1).map(|c| c.final_score).unwrap_or(0.0);

        tracing::debug!(
            top = %top.intent,
            top_score = top.final_score,
            second = candidates.get(1).map(|c| c.intent.as_str()).unwrap_or("-"),
            second_score,
            "Ranked candidates"
        );

        let confident = top.max_example_score >= self.config.max_score_threshold
            || top.avg_example_score >= self.config.avg_score_threshold;

        let decision = if !confident {
            Decision::BelowThreshold
        } else if top.final_score - second_score < self.config.ambiguity_delta {
            Decision::Ambiguous
        } else {
            Decision::Accepted
        };

        let chosen = match decision {
            Decision::Accepted => self
                .registry
                .get(&top.intent)
                .unwrap_or_else(|| self.registry.fallback()),
            _ => self.registry.fallback(),
        };

        let confidence = top.final_score;
        tracing::debug!(
            intent = %chosen.name(),
            confidence,
            decision = ?decision,
            "Intent chosen"
        );

        Classification {
            chosen_intent: chosen.name().to_string(),
            confidence,
            handler: chosen.handler().to_string(),
            decision,
            candidates,
        }
    }

    fn score(&self, intent: &RegisteredIntent, normalized: &str) -> ScoredCandidate {
        let similarities = intent.space.scores(normalized);
        let max_example_score = max_score(&similarities);
        let avg_example_score = mean_score(&similarities);

        let keywords = &intent.definition.keywords;
        let keyword_score = if keywords.is_empty() {
            0.0
        } else {
            let present = keywords.iter().filter(|kw| normalized.contains(kw.as_str())).count();
            present as f64 / keywords.len() as f64
        };

        let final_score = self.config.max_weight * max_example_score
            + self.config.avg_weight * avg_example_score
            + self.config.keyword_weight * keyword_score;

        tracing::trace!(
            intent = %intent.name(),
            max = max_example_score,
            avg = avg_example_score,
            keyword = keyword_score,
            final_score,
            "Scored intent"
        );

        ScoredCandidate {
            intent: intent.name().to_string(),
            max_example_score,
            avg_example_score,
            keyword_score,
            final_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, IntentDefinition};

    fn default_classifier() -> IntentClassifier {
        let config = ClassifierConfig::default();
        let registry = IntentRegistry::new(default_catalog(), &config).unwrap();
        IntentClassifier::new(Arc::new(registry), config)
    }

    fn classifier_for(definitions: Vec<IntentDefinition>) -> IntentClassifier {
        let config = ClassifierConfig::default();
        let registry = IntentRegistry::new(definitions, &config).unwrap();
        IntentClassifier::new(Arc::new(registry), config)
    }

    #[test]
    fn test_priority_keyword_short_circuits() {
        let classifier = default_classifier();
        let result = classifier.classify("Hello there");

        assert_eq!(result.chosen_intent, "human_context");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.handler, "get_human_context");
        assert_eq!(result.decision, Decision::PriorityKeyword);
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_priority_keyword_matches_inside_words() {
        // "this" contains "hi"
        let result = default_classifier().classify("I will not pay this month");
        assert_eq!(result.chosen_intent, "human_context");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_upi_payment() {
        let result = default_classifier().classify("I want to pay via UPI using Google Pay");

        assert_eq!(result.chosen_intent, "make_payment_upi");
        assert_eq!(result.handler, "make_payment");
        assert_eq!(result.decision, Decision::Accepted);

        let top = &result.candidates[0];
        assert_eq!(top.intent, "make_payment_upi");
        assert!(top.max_example_score > 0.60);
        assert!((top.keyword_score - 0.4).abs() < 1e-9);
        assert!((result.confidence - 0.5433).abs() < 1e-3);
    }

    #[test]
    fn test_no_overlap_falls_back_with_zero_confidence() {
        let result = default_classifier().classify("xyzzy plugh quux");

        assert_eq!(result.chosen_intent, "other");
        assert_eq!(result.handler, "get_other");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.decision, Decision::BelowThreshold);
        // All scores tie at zero, so the first registered intent ranks first
        assert_eq!(result.candidates[0].intent, "make_payment_upi");
        assert_eq!(result.candidates[1].intent, "make_payment_netbanking");
    }

    #[test]
    fn test_ambiguity_fallback_keeps_top_confidence() {
        // "thanks" and "other" both contain the exact example
        let result = default_classifier().classify("thanks");

        assert_eq!(result.decision, Decision::Ambiguous);
        assert_eq!(result.chosen_intent, "other");
        assert_eq!(result.candidates[0].intent, "thanks");
        assert_eq!(result.candidates[1].intent, "other");
        assert_eq!(result.confidence, result.candidates[0].final_score);
        assert!((result.confidence - 0.8167).abs() < 1e-3);
        assert!(result.is_fallback());
    }

    #[test]
    fn test_below_threshold_reports_top_score() {
        let result = default_classifier().classify("show my loan balance");
        assert_eq!(result.chosen_intent, "other");
        assert_eq!(result.decision, Decision::BelowThreshold);
        assert!(result.confidence > 0.0);
        assert_eq!(result.confidence, result.candidates[0].final_score);
    }

    #[test]
    fn test_common_intents() {
        let classifier = default_classifier();
        let cases = [
            ("Loan details", "loan_balance"),
            ("What is my interest rate?", "loan_interest_query"),
            ("Show EMI split", "emi_breakdown"),
            ("Reset password", "security_password_reset"),
            ("Forgot password", "security_password_reset"),
            ("Speak to agent", "talk_to_agent"),
            ("I can't pay today", "not_willing_to_pay"),
            ("Pay cash at branch", "make_payment_cash"),
            ("yes", "affirm"),
            ("no", "deny"),
        ];
        for (text, expected) in cases {
            assert_eq!(classifier.classify(text).chosen_intent, expected, "input: {}", text);
        }
    }

    #[test]
    fn test_zero_keywords_score_zero() {
        let result = default_classifier().classify("what's the weather");
        let other = result.candidates.iter().find(|c| c.intent == "other").unwrap();
        assert_eq!(other.keyword_score, 0.0);
        assert!((other.max_example_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_scores_keep_registration_order() {
        let classifier = classifier_for(vec![
            IntentDefinition::new("first", "h").with_examples(&["check balance"]),
            IntentDefinition::new("second", "h").with_examples(&["check balance"]),
            IntentDefinition::new("human_context", "h").with_keywords(&["hello"]),
            IntentDefinition::new("other", "h"),
        ]);

        let result = classifier.classify("check balance");
        assert_eq!(result.candidates[0].intent, "first");
        assert_eq!(result.candidates[1].intent, "second");
        assert_eq!(result.candidates[0].final_score, result.candidates[1].final_score);
        // Identical leaders are ambiguous by definition
        assert_eq!(result.chosen_intent, "other");
    }

    #[test]
    fn test_fallback_intent_can_win_outright() {
        let classifier = classifier_for(vec![
            IntentDefinition::new("human_context", "h"),
            IntentDefinition::new("other", "g").with_examples(&["anything at all"]),
        ]);
        let result = classifier.classify("anything at all");
        assert_eq!(result.chosen_intent, "other");
        assert_eq!(result.decision, Decision::Accepted);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = default_classifier();
        let a = classifier.classify("Pay via net banking");
        for _ in 0..50 {
            let b = classifier.classify("Pay via net banking");
            assert_eq!(a.chosen_intent, b.chosen_intent);
            assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
            assert_eq!(a.candidates, b.candidates);
        }
    }
}
