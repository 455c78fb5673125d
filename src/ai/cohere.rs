//! Cohere chat API client implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    build_http_client, log_response_success, AiClient, AiClientMetadata, ChatMessage,
    CompletionRequest, ProviderError,
};

/// Provider name used for labels and logs.
pub const PROVIDER_NAME: &str = "Cohere";

/// Default Cohere API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.cohere.com";

/// Connector reference in the request body.
#[derive(Serialize, Debug)]
struct Connector {
    id: &'static str,
}

/// Cohere chat request body.
#[derive(Serialize, Debug)]
struct CohereChatRequest<'a> {
    chat_history: Vec<ChatMessage>,
    message: &'a str,
    connectors: Vec<Connector>,
    max_tokens: u32,
    temperature: f32,
    model: &'a str,
    seed: u32,
    p: f32,
}

impl<'a> CohereChatRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            chat_history: request.history(),
            message: &request.message,
            connectors: vec![Connector { id: "web-search" }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            model: &request.model,
            seed: request.seed,
            p: request.top_p,
        }
    }
}

/// Cohere chat response.
#[derive(Deserialize, Debug)]
struct CohereChatResponse {
    text: Option<String>,
    generation_id: Option<String>,
    finish_reason: Option<String>,
}

/// Cohere chat API client.
pub struct CohereAiClient {
    /// HTTP client for API requests.
    client: Client,
    /// API key sent as a bearer token.
    api_key: String,
    /// Base URL without the endpoint path.
    base_url: String,
}

impl CohereAiClient {
    /// Creates a client with the given request timeout.
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            api_key,
            base_url,
        })
    }

    /// Full chat endpoint URL.
    fn api_url(&self) -> String {
        let url = format!("{}/v1/chat", self.base_url.trim_end_matches('/'));
        debug!(base_url = %self.base_url, full_url = %url, "Constructed Cohere API URL");
        url
    }

    async fn chat(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        debug!(
            system_prompt_len = request.system_prompt.len(),
            message_len = request.message.len(),
            model = %request.model,
            seed = request.seed,
            "Preparing Cohere API request"
        );

        let body = CohereChatRequest::from_request(request);

        let api_url = self.api_url();
        info!(url = %api_url, model = %request.model, "Sending request to Cohere API");

        let response = self
            .client
            .post(&api_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: CohereChatResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponseFormat(e.to_string()))?;

        debug!(
            generation_id = ?parsed.generation_id,
            finish_reason = ?parsed.finish_reason,
            "Received Cohere API response"
        );

        parsed.text.ok_or_else(|| {
            ProviderError::InvalidResponseFormat("No text in response".to_string())
        })
    }
}

impl AiClient for CohereAiClient {
    fn send_request<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.chat(request).await;
            log_response_success(PROVIDER_NAME, &result);
            result
        })
    }

    fn get_metadata(&self) -> AiClientMetadata {
        AiClientMetadata {
            provider: PROVIDER_NAME.to_string(),
            base_url: self.base_url.clone(),
        }
    }
}
