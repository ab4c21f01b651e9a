use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode chat-completion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("model returned no completion text")]
    EmptyResponse,

    #[error("model refused the request: {0}")]
    Refused(String),

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

impl LlmError {
    /// `true` for failures that happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, LlmError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }
}
