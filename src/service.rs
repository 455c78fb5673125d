//! Request orchestration: prompt, provider call, parsing, presentation.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ai::{AiClient, CompletionRequest, ProviderError, RandomSeed, SeedSource};
use crate::choice::{
    commit_choice, error_choice, review_choice, validation_error_choice, ListChoice, ProviderLabel,
};
use crate::config::CommitConfig;
use crate::prompt::{generate_prompt, CommitType, CODE_REVIEW_PROMPT};
use crate::response::{parse_commit_messages, sanitize_review, AiResponse};
use crate::utils::exchange_log::ExchangeLogger;

/// Failures of a single generation request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Strict validation dropped every candidate.
    #[error("All {rejected} generated messages failed {commit_type} validation")]
    Validation {
        commit_type: CommitType,
        rejected: usize,
    },
}

/// Generates commit messages and reviews for a staged diff.
pub struct CommitService {
    client: Box<dyn AiClient>,
    config: CommitConfig,
    seed: Box<dyn SeedSource>,
    logger: Option<Arc<dyn ExchangeLogger>>,
    label: ProviderLabel,
}

impl CommitService {
    /// Creates a service with random seeds and no exchange logging.
    pub fn new(client: Box<dyn AiClient>, config: CommitConfig) -> Self {
        Self {
            client,
            config,
            seed: Box::new(RandomSeed),
            logger: None,
            label: ProviderLabel::cohere(),
        }
    }

    #[must_use]
    pub fn with_seed_source(mut self, seed: impl SeedSource + 'static) -> Self {
        self.seed = Box::new(seed);
        self
    }

    /// Records exchanges when logging is enabled in the configuration.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: ProviderLabel) -> Self {
        self.label = label;
        self
    }

    pub fn config(&self) -> &CommitConfig {
        &self.config
    }

    /// Builds the request for a diff, drawing a fresh seed.
    pub fn build_request(&self, system_prompt: String, diff: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt,
            message: CompletionRequest::diff_message(diff),
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
            seed: self.seed.next_seed(),
        }
    }

    /// Asks the provider for commit message candidates.
    pub async fn generate_commit_messages(
        &self,
        diff: &str,
    ) -> Result<Vec<AiResponse>, ServiceError> {
        let system_prompt = generate_prompt(&self.config.prompt_options());
        let text = self
            .complete(self.label.name(), system_prompt, diff)
            .await?;

        let outcome = parse_commit_messages(
            &text,
            self.config.commit_type,
            self.config.generate,
            self.config.validation,
        );

        if outcome.responses.is_empty() && outcome.rejected > 0 {
            return Err(ServiceError::Validation {
                commit_type: self.config.commit_type,
                rejected: outcome.rejected,
            });
        }
        if outcome.responses.is_empty() {
            warn!("Completion contained no usable commit messages");
        }

        Ok(outcome.responses)
    }

    /// Asks the provider for a review of the diff.
    pub async fn generate_code_review(&self, diff: &str) -> Result<Vec<AiResponse>, ServiceError> {
        let label = format!("{} Review", self.label.name());
        let text = self
            .complete(&label, CODE_REVIEW_PROMPT.to_string(), diff)
            .await?;
        Ok(sanitize_review(&text))
    }

    /// Commit message candidates as list items; failures become one error item.
    pub async fn commit_choices(&self, diff: &str) -> Vec<ListChoice> {
        match self.generate_commit_messages(diff).await {
            Ok(responses) => responses
                .iter()
                .map(|response| commit_choice(&self.label, response, self.config.include_body))
                .collect(),
            Err(e) => vec![self.failure_choice(&e)],
        }
    }

    /// Review as list items; failures become one error item.
    pub async fn review_choices(&self, diff: &str) -> Vec<ListChoice> {
        match self.generate_code_review(diff).await {
            Ok(responses) => responses
                .iter()
                .map(|response| review_choice(&self.label, response))
                .collect(),
            Err(e) => vec![self.failure_choice(&e)],
        }
    }

    fn failure_choice(&self, error: &ServiceError) -> ListChoice {
        match error {
            ServiceError::Provider(e) => error_choice(&self.label, e),
            ServiceError::Validation {
                commit_type,
                rejected,
            } => validation_error_choice(&self.label, *commit_type, *rejected),
        }
    }

    async fn complete(
        &self,
        log_label: &str,
        system_prompt: String,
        diff: &str,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(system_prompt, diff);
        let provider = self.client.get_metadata().provider;

        info!(
            provider = %provider,
            model = %request.model,
            seed = request.seed,
            "Requesting completion"
        );

        let text = match self.client.send_request(&request).await {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, timeout = e.is_timeout(), "Provider request failed");
                return Err(e);
            }
        };

        if self.config.logging {
            if let Some(logger) = &self.logger {
                logger.log_exchange(log_label, diff, &request.system_prompt, &text);
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::ai::test_utils::ConfigurableMockAiClient;
    use crate::ai::FixedSeed;
    use crate::config::{env_keys, ConfigOverrides};
    use crate::response::ValidationPolicy;
    use crate::utils::settings::Settings;

    const DIFF: &str = "diff --git a/a.ts b/a.ts\n+export const parse = JSON.parse;\n";

    fn config(overrides: ConfigOverrides) -> CommitConfig {
        CommitConfig::resolve(
            &Settings::default(),
            |k| (k == env_keys::API_KEY).then(|| "test-key".to_string()),
            &overrides,
        )
        .unwrap()
    }

    fn service(
        responses: Vec<Result<String, ProviderError>>,
        overrides: ConfigOverrides,
    ) -> (CommitService, crate::ai::test_utils::RequestRecordHandle) {
        let client = ConfigurableMockAiClient::new(responses);
        let handle = client.request_handle();
        let service = CommitService::new(Box::new(client), config(overrides))
            .with_seed_source(FixedSeed(42))
            .with_label(ProviderLabel::cohere().plain());
        (service, handle)
    }

    #[derive(Default)]
    struct RecordingLogger {
        entries: Mutex<Vec<(String, String, String, String)>>,
    }

    impl ExchangeLogger for RecordingLogger {
        fn log_exchange(&self, label: &str, diff: &str, prompt: &str, response: &str) {
            self.entries.lock().unwrap().push((
                label.to_string(),
                diff.to_string(),
                prompt.to_string(),
                response.to_string(),
            ));
        }
    }

    #[tokio::test]
    async fn end_to_end_conventional_with_body() {
        let completion = r#"[{"message":"feat: add parser","body":"Adds json parsing"},{"message":"fix: handle empty input"}]"#;
        let (service, handle) = service(
            vec![Ok(completion.to_string())],
            ConfigOverrides {
                commit_type: Some("conventional".to_string()),
                generate: Some(2),
                include_body: Some(true),
                ..ConfigOverrides::default()
            },
        );

        let choices = service.commit_choices(DIFF).await;

        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].value, "feat: add parser\n\nAdds json parsing");
        assert_eq!(choices[1].value, "fix: handle empty input");
        assert!(choices.iter().all(ListChoice::is_selectable));
        assert_eq!(handle.request_count(), 1);
    }

    #[tokio::test]
    async fn request_payload_is_deterministic_with_fixed_seed() {
        let (service, handle) = service(
            vec![Ok("[]".to_string())],
            ConfigOverrides {
                generate: Some(3),
                ..ConfigOverrides::default()
            },
        );

        service.generate_commit_messages(DIFF).await.unwrap();

        let request = &handle.requests()[0];
        assert_eq!(request.seed, 42);
        assert_eq!(request.model, "command");
        assert_eq!(request.max_tokens, 1024);
        assert_eq!(request.message, format!("Here is the diff: {DIFF}"));
        assert!(request.system_prompt.contains("Provide 3 commit messages"));
        assert!(request.system_prompt.contains("Maximum 50 characters"));
        assert_eq!(
            request,
            &service.build_request(request.system_prompt.clone(), DIFF)
        );
    }

    #[tokio::test]
    async fn timeout_becomes_single_error_choice() {
        let (service, _) = service(vec![Err(ProviderError::Timeout)], ConfigOverrides::default());

        let choices = service.commit_choices(DIFF).await;

        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].value, "Request timed out error!");
        assert!(choices[0].is_error);
        assert!(choices[0].disabled);
    }

    #[tokio::test]
    async fn api_error_message_is_extracted() {
        let (service, _) = service(
            vec![Err(ProviderError::Api {
                status: 401,
                body: r#"{"message":"invalid api token"}"#.to_string(),
            })],
            ConfigOverrides::default(),
        );

        let choices = service.commit_choices(DIFF).await;

        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].name, "[Cohere] 401 invalid api token");
        assert_eq!(choices[0].value, "invalid api token");
    }

    #[tokio::test]
    async fn unparseable_completion_yields_no_choices() {
        let (service, _) = service(
            vec![Ok("Sorry, I cannot help with that.".to_string())],
            ConfigOverrides::default(),
        );
        assert!(service.commit_choices(DIFF).await.is_empty());
    }

    #[tokio::test]
    async fn strict_policy_reports_validation_failure() {
        let (service, _) = service(
            vec![Ok(r#"[{"message":"update things"}]"#.to_string())],
            ConfigOverrides {
                validation: Some(ValidationPolicy::Strict),
                ..ConfigOverrides::default()
            },
        );

        let err = service.generate_commit_messages(DIFF).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation {
                commit_type: CommitType::Conventional,
                rejected: 1,
            }
        );
    }

    #[tokio::test]
    async fn strict_policy_failure_is_one_error_choice() {
        let (service, _) = service(
            vec![Ok(r#"[{"message":"update things"},{"message":"more"}]"#.to_string())],
            ConfigOverrides {
                validation: Some(ValidationPolicy::Strict),
                ..ConfigOverrides::default()
            },
        );

        let choices = service.commit_choices(DIFF).await;
        assert_eq!(choices.len(), 1);
        assert!(choices[0].is_error);
        assert!(choices[0].value.contains("2 rejected"));
    }

    #[tokio::test]
    async fn review_uses_review_prompt_and_logs() {
        let logger = Arc::new(RecordingLogger::default());
        let (service, handle) = service(
            vec![Ok("# Solid change\n\n- consider a test".to_string())],
            ConfigOverrides::default(),
        );
        let service = service.with_logger(logger.clone());

        let choices = service.review_choices(DIFF).await;

        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].short, "Solid change");
        assert_eq!(choices[0].value, "# Solid change\n\n- consider a test");
        assert_eq!(handle.requests()[0].system_prompt, CODE_REVIEW_PROMPT);

        let entries = logger.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "Cohere Review");
        assert_eq!(entries[0].1, DIFF);
        assert_eq!(entries[0].2, CODE_REVIEW_PROMPT);
    }

    #[tokio::test]
    async fn commit_exchange_is_logged_with_provider_label() {
        let logger = Arc::new(RecordingLogger::default());
        let (service, _) = service(vec![Ok("[]".to_string())], ConfigOverrides::default());
        let service = service.with_logger(logger.clone());

        service.generate_commit_messages(DIFF).await.unwrap();

        let entries = logger.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "Cohere");
        assert_eq!(entries[0].3, "[]");
    }

    #[tokio::test]
    async fn failed_request_is_not_logged() {
        let logger = Arc::new(RecordingLogger::default());
        let (service, _) = service(vec![Err(ProviderError::Timeout)], ConfigOverrides::default());
        let service = service.with_logger(logger.clone());

        let _ = service.generate_commit_messages(DIFF).await;

        assert!(logger.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn logging_disabled_skips_exchange_log() {
        let config = CommitConfig::resolve(
            &Settings::default(),
            |k| match k {
                env_keys::API_KEY => Some("test-key".to_string()),
                env_keys::LOGGING => Some("false".to_string()),
                _ => None,
            },
            &ConfigOverrides::default(),
        )
        .unwrap();
        assert!(!config.logging);

        let logger = Arc::new(RecordingLogger::default());
        let client = ConfigurableMockAiClient::new(vec![Ok("[]".to_string())]);
        let handle = client.request_handle();
        let service = CommitService::new(Box::new(client), config)
            .with_seed_source(FixedSeed(42))
            .with_logger(logger.clone());

        service.generate_commit_messages(DIFF).await.unwrap();

        assert_eq!(handle.request_count(), 1);
        assert!(logger.entries.lock().unwrap().is_empty());
    }
}
