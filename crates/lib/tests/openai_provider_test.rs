//! # OpenAI Provider Tests
//!
//! Runs the provider against a wiremock server to pin down the request
//! shape (bearer auth, model id, strict json_schema response format) and
//! the failure semantics for API errors and malformed output.

mod common;

use common::setup_tracing;
use serde_json::json;
use snapquery::errors::CoreError;
use snapquery::prompts::query_response_schema;
use snapquery::providers::ai::{openai::OpenAiProvider, AiProvider};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

/// Verifies the full happy path: the request carries the credential, the
/// default model, and the strict schema constraint, and the JSON content of
/// the first choice is returned as a parsed object.
#[tokio::test]
async fn sends_constrained_request_and_parses_content() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "temperature": 0.0,
            "response_format": {
                "type": "json_schema",
                "json_schema": {"strict": true}
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion("{\"query\":\"SELECT 1\"}")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", None, Some(&server.uri())).unwrap();
    let value = provider
        .generate_structured("system", "user", &query_response_schema())
        .await
        .unwrap();

    assert_eq!(value, json!({"query": "SELECT 1"}));
}

/// A model override and a base URL with a trailing slash are both honored.
#[tokio::test]
async fn honors_model_override_and_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "local-coder"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion("{\"query\":\"SELECT 2\"}")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/", server.uri());
    let provider = OpenAiProvider::new("test-key", Some("local-coder"), Some(&base)).unwrap();
    let value = provider
        .generate_structured("system", "user", &query_response_schema())
        .await
        .unwrap();

    assert_eq!(value["query"], "SELECT 2");
}

/// Non-2xx responses surface as an API error carrying the body verbatim,
/// with no retry (the mock expects exactly one request).
#[tokio::test]
async fn api_error_body_propagates_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("insufficient_quota"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", None, Some(&server.uri())).unwrap();
    let err = provider
        .generate_structured("system", "user", &query_response_schema())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::AiApi(_)));
    assert!(err.to_string().contains("insufficient_quota"));
}

/// Message content that is not a JSON object is a malformed-response error.
#[tokio::test]
async fn non_json_content_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion("SELECT 1")))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", None, Some(&server.uri())).unwrap();
    let err = provider
        .generate_structured("system", "user", &query_response_schema())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::MalformedAiResponse(_)));
}

/// A response without choices has no content to parse and fails the same way.
#[tokio::test]
async fn empty_choices_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", None, Some(&server.uri())).unwrap();
    let err = provider
        .generate_structured("system", "user", &query_response_schema())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::MalformedAiResponse(_)));
}

/// An empty credential is rejected before any request is issued.
#[test]
fn empty_api_key_is_rejected() {
    let err = OpenAiProvider::new("", None, None).unwrap_err();
    assert!(matches!(err, CoreError::MissingApiKey));
}
