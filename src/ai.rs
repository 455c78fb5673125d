//! AI client trait and request definitions.

pub mod cohere;
pub mod error;
pub mod seed;

#[cfg(test)]
pub(crate) mod test_utils;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

pub use error::{ProviderError, TIMEOUT_MESSAGE};
pub use seed::{FixedSeed, RandomSeed, SeedSource, SEED_RANGE};

use crate::config::CommitConfig;

/// Role of a message in the chat history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChatRole {
    /// Instructions for the model.
    System,
}

/// One role-tagged entry of the chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub message: String,
}

/// Provider-neutral completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instructions; sent as history only when non-empty.
    pub system_prompt: String,
    /// User message carrying the diff.
    pub message: String,
    pub model: String,
    pub temperature: f32,
    /// Nucleus sampling parameter.
    pub top_p: f32,
    pub max_tokens: u32,
    pub seed: u32,
}

impl CompletionRequest {
    /// Wraps a diff into the user message sent to the model.
    pub fn diff_message(diff: &str) -> String {
        format!("Here is the diff: {diff}")
    }

    /// Chat history preceding the user message.
    pub fn history(&self) -> Vec<ChatMessage> {
        if self.system_prompt.is_empty() {
            Vec::new()
        } else {
            vec![ChatMessage {
                role: ChatRole::System,
                message: self.system_prompt.clone(),
            }]
        }
    }
}

/// Metadata about an AI client implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiClientMetadata {
    /// Service provider name.
    pub provider: String,
    /// Endpoint the client talks to.
    pub base_url: String,
}

// ── Shared helpers for AI client implementations ────────────────────

/// Builds an HTTP client with the given request timeout.
pub(crate) fn build_http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::ClientBuild(e.to_string()))
}

/// Logs successful text extraction from an AI API response.
pub(crate) fn log_response_success(provider: &str, result: &Result<String, ProviderError>) {
    if let Ok(text) = result {
        tracing::debug!(
            response_len = text.len(),
            "Successfully extracted text content from {} API response",
            provider
        );
        tracing::debug!(
            response_content = %text,
            "{} API response content",
            provider
        );
    }
}

/// Trait for AI service clients.
pub trait AiClient: Send + Sync {
    /// Sends a request to the AI service and returns the raw completion.
    fn send_request<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

    /// Returns metadata about the AI client implementation.
    fn get_metadata(&self) -> AiClientMetadata;
}

/// Creates the Cohere client described by the configuration.
pub fn create_default_client(config: &CommitConfig) -> Result<Box<dyn AiClient>, ProviderError> {
    let client = cohere::CohereAiClient::new(
        config.api_key.clone(),
        config.base_url.as_str().to_string(),
        config.timeout,
    )?;
    Ok(Box::new(client))
}
