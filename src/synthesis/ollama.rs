//! Ollama-backed text generation.
//!
//! Single round trip against the Ollama chat API with a per-request
//! timeout budget. Transport failures map onto the `SynthesisError`
//! taxonomy so callers can distinguish retryable conditions.

use crate::config::ModelConfig;
use crate::synthesis::{SynthesisError, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Chat message sent to the model.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

const SYSTEM_PROMPT: &str = "You are an analyst of YouTube content creator careers. \
You receive a structured profile and computed metrics and respond with a single \
JSON object containing the requested sections. Only output valid JSON.";

/// `TextGenerator` implementation backed by a local or remote Ollama server.
pub struct OllamaGenerator {
    url: String,
    model: String,
    temperature: f32,
    timeout_seconds: u64,
    http_client: reqwest::Client,
}

impl OllamaGenerator {
    /// Create a generator from model settings.
    pub fn new(config: &ModelConfig) -> Self {
        info!(
            "Initializing synthesis backend {} at {}",
            config.name, config.ollama_url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: config.ollama_url.clone(),
            model: config.name.clone(),
            temperature: config.temperature,
            timeout_seconds: config.timeout_seconds,
            http_client,
        }
    }
}

impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, SynthesisError> {
        let url = format!("{}/api/chat", self.url);

        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        debug!("Sending synthesis request ({} chars)", prompt.len());

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout {
                        seconds: self.timeout_seconds,
                    }
                } else if e.is_connect() {
                    SynthesisError::Unavailable {
                        reason: format!("cannot connect to Ollama at {}", self.url),
                    }
                } else {
                    SynthesisError::Unavailable {
                        reason: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Unavailable {
                reason: format!("Ollama API error {}: {}", status, body),
            });
        }

        let chat_response: OllamaChatResponse =
            response
                .json()
                .await
                .map_err(|e| SynthesisError::Unavailable {
                    reason: format!("failed to parse Ollama response: {}", e),
                })?;

        Ok(chat_response.message.content)
    }
}
