//! Disposition model client
//!
//! Sends the ordered intent list of a finished conversation to an Ollama
//! `/api/generate` model and returns its label.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use emi_assist_config::DispositionConfig;
use emi_assist_core::DispositionSummarizer;

use crate::prompt::PromptBuilder;
use crate::LlmError;

/// Prefix of labels produced when the disposition model cannot be reached
pub const DISPOSITION_ERROR_MARKER: &str = "[Error contacting disposition model:";

/// Label used when the model answers with nothing
const UNKNOWN_DISPOSITION: &str = "unknown";

pub struct OllamaDispositionModel {
    client: Client,
    config: DispositionConfig,
}

impl OllamaDispositionModel {
    pub fn new(config: DispositionConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'))
    }

    async fn request(&self, prompt: String) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = self.client
            .post(self.api_url())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("{}: {}", status, error)));
        }

        let body: GenerateResponse = response.json().await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(label_from_response(body.response))
    }
}

fn label_from_response(response: Option<String>) -> String {
    response
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| UNKNOWN_DISPOSITION.to_string())
}

#[async_trait]
impl DispositionSummarizer for OllamaDispositionModel {
    async fn summarize(&self, intents: &[String]) -> String {
        let prompt = PromptBuilder::disposition(intents);

        match self.request(prompt).await {
            Ok(label) => {
                tracing::info!(
                    intents = intents.len(),
                    disposition = %label,
                    "Disposition predicted"
                );
                label
            }
            Err(e) => {
                tracing::warn!(error = %e, "Disposition model unavailable");
                format!("{} {}]", DISPOSITION_ERROR_MARKER, e)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}
