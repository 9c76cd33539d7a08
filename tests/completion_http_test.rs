use httpmock::prelude::*;
use std::time::Duration;
use trip_planner::core::completion::{CompletionClient, CompletionSettings};
use trip_planner::core::{ChatMessage, PlannerVariant, TripRequest};
use trip_planner::{HttpTransport, PlannerError, PromptBuilder};

mod common;

fn settings(endpoint: String) -> CompletionSettings {
    CompletionSettings {
        endpoint,
        ..CompletionSettings::default()
    }
}

#[tokio::test]
async fn test_chat_completion_over_http() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/openai/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .json_body_partial(r#"{"model": "llama3-70b-8192", "temperature": 0.0}"#);
            then.status(200)
                .header("Content-Type", "application/json")
                .body(common::completion_body("Day 1: Eiffel Tower\nDay 2: Louvre"));
        })
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let client = CompletionClient::new(
        settings(server.url("/openai/v1/chat/completions")),
        Some("test-key".to_string()),
        transport,
    );

    let request = TripRequest::new(Some("Boston"), "Paris", 2, "art").unwrap();
    let messages = PromptBuilder::for_variant(PlannerVariant::MultiDay).build(&request);
    let text = client.complete("llama3-70b-8192", &messages).await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(text, "Day 1: Eiffel Tower\nDay 2: Louvre");
}

#[tokio::test]
async fn test_server_error_becomes_upstream_error() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(503)
                .header("Content-Type", "application/json")
                .body(r#"{"error": {"message": "model overloaded"}}"#);
        })
        .await;

    let client = CompletionClient::new(
        settings(server.url("/v1/chat/completions")),
        Some("test-key".to_string()),
        HttpTransport::new(Duration::from_secs(5)).unwrap(),
    );

    let err = client
        .complete("llama3-70b-8192", &[ChatMessage::user("hi")])
        .await
        .unwrap_err();

    api_mock.assert_async().await;
    match err {
        PlannerError::UpstreamError { status, message } => {
            assert_eq!(status, Some(503));
            assert_eq!(message, "model overloaded");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body(common::completion_body("unused"));
        })
        .await;

    let client = CompletionClient::new(
        settings(server.url("/v1/chat/completions")),
        None,
        HttpTransport::new(Duration::from_secs(5)).unwrap(),
    );

    let err = client
        .complete("model", &[ChatMessage::user("hi")])
        .await
        .unwrap_err();

    assert!(matches!(err, PlannerError::ConfigurationError { .. }));
    assert_eq!(api_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_upstream_error() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let client = CompletionClient::new(
        settings("http://127.0.0.1:9/v1/chat/completions".to_string()),
        Some("test-key".to_string()),
        HttpTransport::new(Duration::from_secs(2)).unwrap(),
    );

    let err = client
        .complete("model", &[ChatMessage::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::UpstreamError { .. }));
}
