//! HTTP mock tests for the Gemini provider.

use mentor_kernel::inference::{
    ChatRequest, GeminiConfig, GeminiProvider, InferenceError, LLMProvider, RetryConfig,
};
use reqwest::Url;
use secrecy::SecretString;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn create_provider(server: &MockServer, max_retries: u32) -> GeminiProvider {
    let config = GeminiConfig::new(
        SecretString::new("test-api-key".into()),
        Url::parse(&format!("{}/v1beta/", server.uri())).unwrap(),
    )
    .with_retry(
        RetryConfig::new()
            .with_max_retries(max_retries)
            .with_base_delay_ms(1),
    );
    GeminiProvider::new(config)
}

fn create_test_request() -> ChatRequest {
    ChatRequest::with_message("gemini-1.5-flash", "Question: Thủ đô?\nThought:")
        .with_stop(["\nObservation"])
}

#[tokio::test]
async fn test_successful_generate_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "Question: Thủ đô?\nThought:"}]}],
            "generationConfig": {"temperature": 0.0, "stopSequences": ["\nObservation"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": " Tôi biết.\nFinal Answer: Hà Nội"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 20, "candidatesTokenCount": 7, "totalTokenCount": 27}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = create_provider(&server, 0)
        .chat(create_test_request())
        .await
        .unwrap();

    assert_eq!(response.content, " Tôi biết.\nFinal Answer: Hà Nội");
    assert_eq!(response.total_tokens(), Some(27));
}

#[tokio::test]
async fn test_unknown_model_is_invalid_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = create_provider(&server, 3).chat(create_test_request()).await;

    match result.unwrap_err() {
        InferenceError::InvalidModel { model } => assert_eq!(model, "gemini-1.5-flash"),
        other => panic!("Expected InvalidModel, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_key_is_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error": {"status": "INVALID_ARGUMENT", "details": [{"reason": "API_KEY_INVALID"}]}}"#,
        ))
        .mount(&server)
        .await;

    let result = create_provider(&server, 0).chat(create_test_request()).await;
    assert!(matches!(result.unwrap_err(), InferenceError::Config(_)));
}

#[tokio::test]
async fn test_rate_limit_honours_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Final Answer: ok"}]}}]
        })))
        .mount(&server)
        .await;

    let response = create_provider(&server, 1)
        .chat(create_test_request())
        .await
        .unwrap();
    assert_eq!(response.content, "Final Answer: ok");
}

#[tokio::test]
async fn test_server_error_retries_then_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(3)
        .mount(&server)
        .await;

    let result = create_provider(&server, 2).chat(create_test_request()).await;

    match result.unwrap_err() {
        InferenceError::ApiError(msg) => assert!(msg.contains("HTTP 500")),
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blocked_candidate_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .mount(&server)
        .await;

    let result = create_provider(&server, 0).chat(create_test_request()).await;

    match result.unwrap_err() {
        InferenceError::ApiError(msg) => assert!(msg.contains("SAFETY")),
        other => panic!("Expected ApiError, got {other:?}"),
    }
}
