//! Lexical similarity
//!
//! TF-IDF cosine similarity between one input and a small set of reference
//! phrases. Each call builds its own vocabulary from the input plus the
//! references, so scores for one intent never depend on another intent's
//! examples.
//!
//! Weighting follows the common smoothed TF-IDF scheme:
//! - raw term counts
//! - `idf = ln((1 + n) / (1 + df)) + 1` over the `n` documents in the call
//! - L2-normalized vectors
//!
//! Terms are kept in ordered maps so every sum runs in the same order and
//! repeated calls give bit-identical scores.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Unicode word runs of two or more characters
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w\w+\b").expect("token pattern is valid")
});

/// Lowercase and collapse whitespace runs to single spaces
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased tokens in order of appearance
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Reference phrases of one intent, tokenized once
///
/// Only the term counts are cached. Document frequencies include the input,
/// so weights are recomputed on every call.
#[derive(Debug, Clone, Default)]
pub struct ExampleSpace {
    documents: Vec<BTreeMap<String, usize>>,
}

impl ExampleSpace {
    pub fn new<S: AsRef<str>>(references: &[S]) -> Self {
        Self {
            documents: references.iter().map(|r| term_counts(r.as_ref())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Cosine similarity of `input` against each reference, in reference order
    pub fn scores(&self, input: &str) -> Vec<f64> {
        if self.documents.is_empty() {
            return Vec::new();
        }

        let query = term_counts(input);
        let n = (self.documents.len() + 1) as f64;

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in std::iter::once(&query).chain(self.documents.iter()) {
            for term in doc.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let idf = |term: &str| -> f64 {
            let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        };

        let query_vector = weighted(&query, &idf);

        self.documents
            .iter()
            .map(|doc| cosine(&query_vector, &weighted(doc, &idf)))
            .collect()
    }
}

/// L2-normalized TF-IDF vector; empty when the document has no tokens
fn weighted(
    counts: &BTreeMap<String, usize>,
    idf: &impl Fn(&str) -> f64,
) -> BTreeMap<String, f64> {
    let mut vector: BTreeMap<String, f64> = counts
        .iter()
        .map(|(term, count)| (term.clone(), *count as f64 * idf(term.as_str())))
        .collect();

    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

fn cosine(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, w)| b.get(term).map(|v| w * v))
        .sum();
    dot.clamp(0.0, 1.0)
}

/// One-shot similarity without a cached space
pub fn similarity_scores<S: AsRef<str>>(input: &str, references: &[S]) -> Vec<f64> {
    ExampleSpace::new(references).scores(input)
}

/// Largest score, 0.0 when there are none
pub fn max_score(scores: &[f64]) -> f64 {
    scores.iter().copied().fold(0.0, f64::max)
}

/// Mean score, 0.0 when there are none
pub fn mean_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}
