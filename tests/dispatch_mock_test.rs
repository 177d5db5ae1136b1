//! Dispatcher properties against mocked upstreams.
//!
//! Call-count assertions (`expect(0)` / `expect(1)`) verify that
//! selector and credential validation happen before any network call.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatrelay::{ChatMessage, Dispatcher, ProviderConfig, RelayConfig, RelayError};

fn config_for(upstream: &MockServer, with_keys: bool) -> RelayConfig {
    let mut gemini = ProviderConfig::new(upstream.uri(), "gemini-2.0-flash");
    let mut deepseek = ProviderConfig::new(upstream.uri(), "deepseek/DeepSeek-R1");
    let mut openai = ProviderConfig::new(upstream.uri(), "gpt-4.1").with_publisher("openai");
    if with_keys {
        gemini = gemini.with_api_key("gk");
        deepseek = deepseek.with_api_key("dk");
        openai = openai.with_api_key("ok");
    }
    RelayConfig {
        gemini,
        deepseek,
        openai,
        ..RelayConfig::default()
    }
}

#[tokio::test]
async fn invalid_selector_makes_no_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&upstream)
        .await;

    let dispatcher = Dispatcher::new(&config_for(&upstream, true)).unwrap();
    let err = dispatcher
        .dispatch(&[ChatMessage::user("hi")], Some("gpt-5"))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::InvalidModel(_)));
}

#[tokio::test]
async fn missing_credential_makes_no_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&upstream)
        .await;

    let dispatcher = Dispatcher::new(&config_for(&upstream, false)).unwrap();
    let err = dispatcher
        .dispatch(&[ChatMessage::user("hi")], Some("deepseek"))
        .await
        .unwrap_err();

    match err {
        RelayError::MissingApiKey(provider) => assert_eq!(provider, "deepseek"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn absent_selector_routes_to_gemini() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "gk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "default reply" }] } }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let dispatcher = Dispatcher::new(&config_for(&upstream, true)).unwrap();
    let reply = dispatcher
        .dispatch(&[ChatMessage::user("hi")], None)
        .await
        .unwrap();

    assert_eq!(reply, "default reply");
}

#[tokio::test]
async fn generation_defaults_reach_both_shapes() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_string_contains("\"maxOutputTokens\":1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "g" }] } }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("\"max_tokens\":1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "c" } }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let dispatcher = Dispatcher::new(&config_for(&upstream, true)).unwrap();
    dispatcher
        .dispatch(&[ChatMessage::user("hi")], Some("gemini"))
        .await
        .unwrap();
    dispatcher
        .dispatch(&[ChatMessage::user("hi")], Some("openai"))
        .await
        .unwrap();
}

#[tokio::test]
async fn upstream_status_is_carried_in_the_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&upstream)
        .await;

    let dispatcher = Dispatcher::new(&config_for(&upstream, true)).unwrap();
    let err = dispatcher
        .dispatch(&[ChatMessage::user("hi")], Some("gemini"))
        .await
        .unwrap_err();

    match err {
        RelayError::Api {
            provider, status, ..
        } => {
            assert_eq!(provider, "gemini");
            assert_eq!(status, 429);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
