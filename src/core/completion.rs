use crate::core::{ChatMessage, CompletionTransport};
use crate::utils::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSettings {
    pub endpoint: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: 0.0,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct CompletionClient<T: CompletionTransport> {
    settings: CompletionSettings,
    api_key: Option<String>,
    transport: T,
}

impl<T: CompletionTransport> CompletionClient<T> {
    pub fn new(settings: CompletionSettings, api_key: Option<String>, transport: T) -> Self {
        Self {
            settings,
            api_key,
            transport,
        }
    }

    /// Reads the API key from the variable named in `settings.api_key_env`.
    pub fn from_env(settings: CompletionSettings, transport: T) -> Self {
        let api_key = std::env::var(&settings.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; itinerary requests will fail until it is",
                settings.api_key_env
            );
        }
        Self::new(settings, api_key, transport)
    }

    fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(PlannerError::configuration(format!(
                "API key is missing; set the {} environment variable",
                self.settings.api_key_env
            ))),
        }
    }

    /// Sends one chat completion and returns the model's text unchanged.
    pub async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let api_key = self.api_key()?;

        let request = ChatCompletionRequest {
            model,
            temperature: self.settings.temperature,
            messages,
        };
        let body = serde_json::to_value(&request)?;

        tracing::debug!(
            "Sending completion request to {} (model: {}, messages: {})",
            self.settings.endpoint,
            model,
            messages.len()
        );
        let response = self
            .transport
            .post_json(&self.settings.endpoint, api_key, &body)
            .await?;

        tracing::debug!("Completion response status: {}", response.status);

        if !response.is_success() {
            return Err(PlannerError::upstream(
                Some(response.status),
                extract_error_message(&response.body),
            ));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response.body)
            .map_err(|e| PlannerError::upstream(None, format!("malformed response body: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PlannerError::upstream(None, "response contained no completion text"))
    }
}

/// Pulls `error.message` out of an OpenAI-style error body, falling back to the raw body.
fn extract_error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.chars().take(500).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransportResponse;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct StubTransport {
        response: TransportResponse,
        calls: Arc<Mutex<Vec<(String, String, serde_json::Value)>>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: TransportResponse {
                    status,
                    body: body.to_string(),
                },
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionTransport for StubTransport {
        async fn post_json(
            &self,
            url: &str,
            bearer_token: &str,
            body: &serde_json::Value,
        ) -> Result<TransportResponse> {
            self.calls.lock().unwrap().push((
                url.to_string(),
                bearer_token.to_string(),
                body.clone(),
            ));
            Ok(self.response.clone())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl CompletionTransport for FailingTransport {
        async fn post_json(
            &self,
            _url: &str,
            _bearer_token: &str,
            _body: &serde_json::Value,
        ) -> Result<TransportResponse> {
            Err(PlannerError::upstream(None, "connection refused"))
        }
    }

    fn completion_body(text: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
        })
        .to_string()
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::system("plan"), ChatMessage::user("go")]
    }

    #[tokio::test]
    async fn test_complete_returns_text_unmodified() {
        let transport = StubTransport::new(200, &completion_body("Day 1: ..."));
        let client = CompletionClient::new(
            CompletionSettings::default(),
            Some("secret".to_string()),
            transport.clone(),
        );

        let text = client.complete("llama3-70b-8192", &messages()).await.unwrap();
        assert_eq!(text, "Day 1: ...");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_model_temperature_and_messages() {
        let transport = StubTransport::new(200, &completion_body("ok"));
        let client = CompletionClient::new(
            CompletionSettings::default(),
            Some("secret".to_string()),
            transport.clone(),
        );

        client.complete("llama-3.3-70b-versatile", &messages()).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        let (url, token, body) = &calls[0];
        assert_eq!(url, DEFAULT_ENDPOINT);
        assert_eq!(token, "secret");
        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "go");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network_call() {
        let transport = StubTransport::new(200, &completion_body("unused"));
        let client =
            CompletionClient::new(CompletionSettings::default(), None, transport.clone());

        let err = client.complete("model", &messages()).await.unwrap_err();
        assert!(matches!(err, PlannerError::ConfigurationError { .. }));
        assert!(err.to_string().contains("GROQ_API_KEY"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_api_key_is_treated_as_missing() {
        let transport = StubTransport::new(200, &completion_body("unused"));
        let client = CompletionClient::new(
            CompletionSettings::default(),
            Some("  ".to_string()),
            transport.clone(),
        );

        let err = client.complete("model", &messages()).await.unwrap_err();
        assert!(matches!(err, PlannerError::ConfigurationError { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        let client = CompletionClient::new(
            CompletionSettings::default(),
            Some("bad".to_string()),
            StubTransport::new(401, body),
        );

        match client.complete("model", &messages()).await.unwrap_err() {
            PlannerError::UpstreamError { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "Invalid API Key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_error() {
        let client = CompletionClient::new(
            CompletionSettings::default(),
            Some("key".to_string()),
            StubTransport::new(200, "<html>gateway</html>"),
        );

        let err = client.complete("model", &messages()).await.unwrap_err();
        assert!(matches!(err, PlannerError::UpstreamError { status: None, .. }));
    }

    #[tokio::test]
    async fn test_empty_choices_is_upstream_error() {
        let client = CompletionClient::new(
            CompletionSettings::default(),
            Some("key".to_string()),
            StubTransport::new(200, r#"{"choices":[]}"#),
        );

        let err = client.complete("model", &messages()).await.unwrap_err();
        assert!(err.to_string().contains("no completion text"));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let client = CompletionClient::new(
            CompletionSettings::default(),
            Some("key".to_string()),
            FailingTransport,
        );

        let err = client.complete("model", &messages()).await.unwrap_err();
        assert!(matches!(err, PlannerError::UpstreamError { .. }));
    }

    #[test]
    fn test_extract_error_message_fallbacks() {
        assert_eq!(extract_error_message(""), "empty response body");
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
    }
}
