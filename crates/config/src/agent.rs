//! Classifier, session and collaborator configuration

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Intent classifier thresholds and weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum best-example similarity for the top candidate
    #[serde(default = "default_max_score_threshold")]
    pub max_score_threshold: f64,

    /// Minimum mean example similarity for the top candidate
    #[serde(default = "default_avg_score_threshold")]
    pub avg_score_threshold: f64,

    /// Required gap between the top two final scores
    #[serde(default = "default_ambiguity_delta")]
    pub ambiguity_delta: f64,

    #[serde(default = "default_max_weight")]
    pub max_weight: f64,

    #[serde(default = "default_avg_weight")]
    pub avg_weight: f64,

    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,

    /// Catch-all intent chosen when nothing is confident
    #[serde(default = "default_fallback_intent")]
    pub fallback_intent: String,

    /// Intent whose keywords short-circuit scoring
    #[serde(default = "default_priority_intent")]
    pub priority_intent: String,
}

fn default_max_score_threshold() -> f64 {
    0.60
}
fn default_avg_score_threshold() -> f64 {
    0.50
}
fn default_ambiguity_delta() -> f64 {
    0.08
}
fn default_max_weight() -> f64 {
    0.7
}
fn default_avg_weight() -> f64 {
    0.2
}
fn default_keyword_weight() -> f64 {
    0.1
}
fn default_fallback_intent() -> String {
    "other".to_string()
}
fn default_priority_intent() -> String {
    "human_context".to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_score_threshold: default_max_score_threshold(),
            avg_score_threshold: default_avg_score_threshold(),
            ambiguity_delta: default_ambiguity_delta(),
            max_weight: default_max_weight(),
            avg_weight: default_avg_weight(),
            keyword_weight: default_keyword_weight(),
            fallback_intent: default_fallback_intent(),
            priority_intent: default_priority_intent(),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounded = [
            ("classifier.max_score_threshold", self.max_score_threshold),
            ("classifier.avg_score_threshold", self.avg_score_threshold),
            ("classifier.ambiguity_delta", self.ambiguity_delta),
            ("classifier.max_weight", self.max_weight),
            ("classifier.avg_weight", self.avg_weight),
            ("classifier.keyword_weight", self.keyword_weight),
        ];
        for (field, value) in bounded {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(
                    field,
                    format!("Must be between 0.0 and 1.0, got {}", value),
                ));
            }
        }

        let total = self.max_weight + self.avg_weight + self.keyword_weight;
        if (total - 1.0).abs() > 1e-6 {
            return Err(ConfigError::invalid(
                "classifier.*_weight",
                format!("Weights must sum to 1.0, got {}", total),
            ));
        }

        if self.fallback_intent.trim().is_empty() {
            return Err(ConfigError::invalid("classifier.fallback_intent", "Must not be empty"));
        }
        if self.priority_intent == self.fallback_intent {
            return Err(ConfigError::invalid(
                "classifier.priority_intent",
                "Must differ from the fallback intent",
            ));
        }

        Ok(())
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Phrases that end a session (matched trimmed and case-insensitive)
    #[serde(default = "default_end_phrases")]
    pub end_phrases: Vec<String>,
}

fn default_end_phrases() -> Vec<String> {
    ["end", "finish", "bye", "done", "thankyou", "thank you"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            end_phrases: default_end_phrases(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "session.end_phrases",
                "At least one end phrase is required",
            ));
        }
        Ok(())
    }
}

/// Chat completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retries for transient network failures
    #[serde(default)]
    pub max_retries: u32,

    /// Sampling temperature; model default when unset
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}
fn default_llm_model() -> String {
    "gemma3".to_string()
}
fn default_timeout_seconds() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ollama_endpoint(),
            model: default_llm_model(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: 0,
            temperature: None,
        }
    }
}

/// Disposition model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispositionConfig {
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_disposition_model")]
    pub model: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_disposition_model() -> String {
    "disposition-model".to_string()
}

impl Default for DispositionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ollama_endpoint(),
            model: default_disposition_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
