use std::time::Duration;

use aicommit::ai::cohere::CohereAiClient;
use aicommit::ai::{AiClient, CompletionRequest, FixedSeed, ProviderError};
use aicommit::choice::ProviderLabel;
use aicommit::config::{env_keys, CommitConfig, ConfigOverrides};
use aicommit::service::CommitService;
use aicommit::utils::Settings;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(system_prompt: &str) -> CompletionRequest {
    CompletionRequest {
        system_prompt: system_prompt.to_string(),
        message: CompletionRequest::diff_message("+fn main() {}"),
        model: "command-r".to_string(),
        temperature: 0.5,
        top_p: 0.75,
        max_tokens: 512,
        seed: 123,
    }
}

fn client(server: &MockServer, timeout: Duration) -> CohereAiClient {
    CohereAiClient::new("test-key".to_string(), server.uri(), timeout).unwrap()
}

#[tokio::test]
async fn sends_chat_request_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "chat_history": [{"role": "SYSTEM", "message": "be concise"}],
            "message": "Here is the diff: +fn main() {}",
            "connectors": [{"id": "web-search"}],
            "model": "command-r",
            "max_tokens": 512,
            "seed": 123,
            "p": 0.75,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "[{\"message\":\"feat: add main\"}]",
            "generation_id": "gen-1",
            "finish_reason": "COMPLETE",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server, Duration::from_secs(5))
        .send_request(&request("be concise"))
        .await
        .unwrap();

    assert_eq!(text, r#"[{"message":"feat: add main"}]"#);
}

#[tokio::test]
async fn empty_system_prompt_sends_no_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .and(body_partial_json(json!({ "chat_history": [] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server, Duration::from_secs(5))
        .send_request(&request(""))
        .await
        .unwrap();

    assert_eq!(text, "ok");
}

#[tokio::test]
async fn error_status_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "message": "too many requests" })),
        )
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .send_request(&request("x"))
        .await
        .unwrap_err();

    match err {
        ProviderError::Api { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("too many requests"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "text": "late" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_millis(100))
        .send_request(&request("x"))
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::Timeout);
    assert_eq!(err.to_string(), "Request timed out error!");
}

#[tokio::test]
async fn missing_text_is_invalid_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "generation_id": "g" })))
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .send_request(&request("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidResponseFormat(_)));
}

fn service_for(server: &MockServer, timeout_ms: &str) -> CommitService {
    let uri = server.uri();
    let timeout_ms = timeout_ms.to_string();
    let config = CommitConfig::resolve(
        &Settings::default(),
        move |key| match key {
            k if k == env_keys::API_KEY => Some("test-key".to_string()),
            k if k == env_keys::BASE_URL => Some(uri.clone()),
            k if k == env_keys::TIMEOUT => Some(timeout_ms.clone()),
            _ => None,
        },
        &ConfigOverrides {
            generate: Some(2),
            include_body: Some(true),
            ..ConfigOverrides::default()
        },
    )
    .unwrap();

    let client = aicommit::ai::create_default_client(&config).unwrap();
    CommitService::new(client, config)
        .with_seed_source(FixedSeed(77))
        .with_label(ProviderLabel::cohere().plain())
}

#[tokio::test]
async fn service_end_to_end_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .and(body_partial_json(json!({
            "message": "Here is the diff: diff --git a/a.ts b/a.ts",
            "seed": 77,
            "model": "command",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "Here you go:\n```json\n[{\"message\":\"feat: add parser\",\"body\":\"Adds json parsing\"},{\"message\":\"fix: handle empty input\"}]\n```",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let choices = service_for(&server, "5000")
        .commit_choices("diff --git a/a.ts b/a.ts")
        .await;

    assert_eq!(choices.len(), 2);
    assert_eq!(choices[0].name, "[Cohere] feat: add parser");
    assert_eq!(choices[0].value, "feat: add parser\n\nAdds json parsing");
    assert_eq!(choices[1].value, "fix: handle empty input");
}

#[tokio::test]
async fn service_converts_timeout_into_error_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "text": "[]" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let choices = service_for(&server, "100").commit_choices("diff").await;

    assert_eq!(choices.len(), 1);
    assert!(choices[0].is_error);
    assert!(choices[0].disabled);
    assert_eq!(choices[0].value, "Request timed out error!");
}

#[tokio::test]
async fn service_extracts_api_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid api token" })),
        )
        .mount(&server)
        .await;

    let choices = service_for(&server, "5000").commit_choices("diff").await;

    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0].name, "[Cohere] 401 invalid api token");
    assert_eq!(choices[0].value, "invalid api token");
}
