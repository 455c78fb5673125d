//! Shared test utilities for the `ai` module.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use super::{AiClient, AiClientMetadata, CompletionRequest, ProviderError};

/// Mock AI client with a pre-programmed queue of responses.
///
/// Responses are returned in FIFO order. When the queue is exhausted,
/// subsequent calls return a `Network("no more mock responses")` error.
///
/// Every call records the request it was given; use
/// [`request_handle`](Self::request_handle) to read them after the client
/// has been moved into a [`CommitService`](crate::service::CommitService).
pub(crate) struct ConfigurableMockAiClient {
    responses: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    recorded_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ConfigurableMockAiClient {
    /// Creates a new mock client that will return the given responses in order.
    pub(crate) fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            recorded_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a handle for inspecting dispatched requests.
    pub(crate) fn request_handle(&self) -> RequestRecordHandle {
        RequestRecordHandle {
            recorded_requests: self.recorded_requests.clone(),
        }
    }
}

/// Shared handle to a mock client's recorded requests.
pub(crate) struct RequestRecordHandle {
    recorded_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl RequestRecordHandle {
    /// Returns every recorded request.
    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.recorded_requests.lock().unwrap().clone()
    }

    /// Returns the number of AI requests that were made.
    pub(crate) fn request_count(&self) -> usize {
        self.recorded_requests.lock().unwrap().len()
    }
}

impl AiClient for ConfigurableMockAiClient {
    fn send_request<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        let responses = self.responses.clone();
        let recorded = self.recorded_requests.clone();
        let request = request.clone();
        Box::pin(async move {
            recorded.lock().unwrap().push(request);
            responses.lock().unwrap().pop_front().unwrap_or_else(|| {
                Err(ProviderError::Network("no more mock responses".to_string()))
            })
        })
    }

    fn get_metadata(&self) -> AiClientMetadata {
        AiClientMetadata {
            provider: "Mock".to_string(),
            base_url: "http://mock.invalid".to_string(),
        }
    }
}
