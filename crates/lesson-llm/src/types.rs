use serde::{Deserialize, Serialize};

use crate::{LlmError, Result};

// ─── Request ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// The JSON schema handed to the endpoint in schema-constrained mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaSpec {
    /// Name of the schema (echoed back by the API in errors).
    pub name: String,
    /// Whether the endpoint must reject completions that do not validate.
    pub strict: bool,
    pub schema: serde_json::Value,
}

/// `response_format` directive.
///
/// Serializes to `{"type":"json_schema","json_schema":{…}}` or
/// `{"type":"json_object"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaSpec },
    JsonObject,
}

impl ResponseFormat {
    pub fn strict_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        ResponseFormat::JsonSchema {
            json_schema: JsonSchemaSpec {
                name: name.into(),
                strict: true,
                schema,
            },
        }
    }

    /// Short label used in logs.
    pub fn mode(&self) -> &'static str {
        match self {
            ResponseFormat::JsonSchema { .. } => "json_schema",
            ResponseFormat::JsonObject => "json_object",
        }
    }
}

/// One chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    /// Content of the first message with the given role, if any.
    pub fn message(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }
}

// ─── Response ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Null when the provider refuses or errors mid-generation.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl ChatResponse {
    /// Extract the completion text of the first choice.
    pub fn into_text(self) -> Result<String> {
        let choice = self.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("completion hit max_tokens; output is likely truncated");
        }

        if let Some(refusal) = choice.message.refusal.filter(|r| !r.is_empty()) {
            return Err(LlmError::Refused(refusal));
        }

        choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}
