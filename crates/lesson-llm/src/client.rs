use std::time::Duration;

use futures::future::BoxFuture;

use crate::model::ChatModel;
use crate::types::{ChatRequest, ChatResponse};
use crate::{LlmError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Longest slice of an error body carried into [`LlmError::Api`].
const MAX_ERROR_BODY_LEN: usize = 500;

// ─── ClientConfig ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// API root without the `/chat/completions` suffix.
    pub base_url: String,
    /// `None` leaves reqwest's default (no overall timeout).
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

// ─── OpenAiClient ─────────────────────────────────────────────────────────

/// Chat-completion client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Send one request and return the first choice's content.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            mode = request.response_format.mode(),
            max_tokens = request.max_tokens,
            "sending chat completion"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY_LEN).to_string(),
            });
        }

        let parsed: ChatResponse = serde_json::from_slice(&body)?;
        if let Some(usage) = parsed.usage {
            tracing::debug!(
                served_by = parsed.model.as_deref().unwrap_or("unknown"),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "chat completion usage"
            );
        }
        parsed.into_text()
    }
}

impl ChatModel for OpenAiClient {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.chat(request))
    }
}

/// Cut `s` to at most `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, ResponseFormat};

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.7,
            max_tokens: 100,
            response_format: ResponseFormat::JsonObject,
        }
    }

    fn client_for(server: &mockito::Server) -> OpenAiClient {
        OpenAiClient::new(ClientConfig::new("sk-test").with_base_url(server.url())).unwrap()
    }

    #[test]
    fn new_rejects_blank_api_key() {
        let err = OpenAiClient::new(ClientConfig::new("  ")).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client =
            OpenAiClient::new(ClientConfig::new("k").with_base_url("http://localhost:9/v1/"))
                .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        // Each kana is 3 bytes; 4 bytes lands mid-char.
        assert_eq!(truncate("あいう", 4), "あ");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[tokio::test]
    async fn chat_returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 100,
                "response_format": { "type": "json_object" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"model":"gpt-4o-mini","choices":[{"message":{"role":"assistant","content":"{\"ok\":true}"},"finish_reason":"stop"}],"usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#,
            )
            .create_async()
            .await;

        let text = client_for(&server).chat(&request()).await.unwrap();
        assert_eq!(text, r#"{"ok":true}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chat_maps_error_status_to_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body(r#"{"error":{"message":"Invalid schema for response_format"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).chat(&request()).await.unwrap_err();
        match err {
            LlmError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid schema"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_with_null_content_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null}}]}"#)
            .create_async()
            .await;

        let err = client_for(&server).chat(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn chat_with_garbage_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server).chat(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Decode(_)));
    }
}
