pub mod generate;
pub mod hours;
pub mod serve;

use std::time::Duration;

use clap::Args;
use lesson_core::config::{ENV_MAX_TOKENS, ENV_MODEL, ENV_TEMPERATURE};
use lesson_core::ModelSettings;
use lesson_llm::{ClientConfig, LlmError, OpenAiClient, DEFAULT_BASE_URL};

/// Connection settings for the chat-completion endpoint.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// API key for the chat-completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API root (without /chat/completions)
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds (unset = no timeout)
    #[arg(long, env = "OPENAI_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Model identifier [default: gpt-4o-mini]
    #[arg(long = "model", env = ENV_MODEL)]
    pub model_name: Option<String>,

    /// Sampling temperature, 0 to 2 [default: 0.7]
    #[arg(long, env = ENV_TEMPERATURE)]
    pub temperature: Option<String>,

    /// Output token budget of the primary call [default: 6000]
    #[arg(long, env = ENV_MAX_TOKENS)]
    pub max_tokens: Option<String>,
}

impl ModelArgs {
    /// Model settings from flags, which clap already backfills from the
    /// environment. Validation stays with [`ModelSettings::from_lookup`].
    pub fn settings(&self) -> lesson_core::Result<ModelSettings> {
        ModelSettings::from_lookup(|name| match name {
            ENV_MODEL => self.model_name.clone(),
            ENV_TEMPERATURE => self.temperature.clone(),
            ENV_MAX_TOKENS => self.max_tokens.clone(),
            _ => None,
        })
    }

    pub fn client(&self) -> Result<OpenAiClient, LlmError> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;
        OpenAiClient::new(
            ClientConfig::new(api_key)
                .with_base_url(self.base_url.clone())
                .with_timeout(self.timeout_secs.map(Duration::from_secs)),
        )
    }
}
