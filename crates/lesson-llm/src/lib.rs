//! `lesson-llm` — thin async driver for an OpenAI-compatible chat-completion API.
//!
//! The lesson-plan generator only ever needs one thing from a model: send a
//! system + user message pair with a response-format directive and get the
//! completion text back. This crate owns that exchange and nothing else.
//!
//! # Architecture
//!
//! ```text
//! ChatRequest        ← model, messages, temperature, max_tokens,
//!     │                 response_format (json_schema strict | json_object)
//!     ▼
//! ChatModel (trait)  ← the seam the planner depends on
//!     │
//!     ├── OpenAiClient   ← POST {base_url}/chat/completions via reqwest
//!     └── ScriptedModel  ← recording double (feature = "testing")
//!     ▼
//! String             ← first choice's message.content
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use lesson_llm::{ChatMessage, ChatModel, ChatRequest, ClientConfig, OpenAiClient, ResponseFormat};
//!
//! let client = OpenAiClient::new(ClientConfig::new("sk-..."))?;
//! let request = ChatRequest {
//!     model: "gpt-4o-mini".into(),
//!     messages: vec![ChatMessage::system("JSONで答えて"), ChatMessage::user("こんにちは")],
//!     temperature: 0.7,
//!     max_tokens: 512,
//!     response_format: ResponseFormat::JsonObject,
//! };
//! let text = client.complete(&request).await?;
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod scripted;

#[cfg(test)]
mod tests;

pub use client::{ClientConfig, OpenAiClient, DEFAULT_BASE_URL};
pub use error::LlmError;
pub use model::ChatModel;
pub use types::{ChatMessage, ChatRequest, ChatResponse, JsonSchemaSpec, ResponseFormat, Role, Usage};

#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedModel;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, LlmError>;
