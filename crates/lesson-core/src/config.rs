use serde::Serialize;

use crate::error::{LessonError, Result};

pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_TEMPERATURE: &str = "OPENAI_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "OPENAI_MAX_TOKENS";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Plans of eight or more hours truncate under a small budget.
pub const DEFAULT_MAX_TOKENS: u32 = 6000;

/// Ceiling on the repair call's temperature.
pub const REPAIR_MAX_TEMPERATURE: f32 = 0.3;
/// Floor on the repair call's output budget.
pub const REPAIR_MIN_TOKENS: u32 = 6000;

// ---------------------------------------------------------------------------
// ModelSettings
// ---------------------------------------------------------------------------

/// Model name and sampling budget for the primary (and fallback) call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ModelSettings {
    /// Read settings through `lookup`, keyed by the `OPENAI_*` variable names;
    /// unset or blank values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(model) = get(ENV_MODEL) {
            settings.model = model.trim().to_string();
        }
        if let Some(raw) = get(ENV_TEMPERATURE) {
            settings.temperature = parse_temperature(&raw)?;
        }
        if let Some(raw) = get(ENV_MAX_TOKENS) {
            settings.max_tokens = parse_max_tokens(&raw)?;
        }
        Ok(settings)
    }

    pub fn repair_temperature(&self) -> f32 {
        self.temperature.min(REPAIR_MAX_TEMPERATURE)
    }

    pub fn repair_max_tokens(&self) -> u32 {
        self.max_tokens.max(REPAIR_MIN_TOKENS)
    }
}

fn invalid(name: &str, value: &str, reason: &str) -> LessonError {
    LessonError::InvalidSetting {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_temperature(raw: &str) -> Result<f32> {
    let t: f32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(ENV_TEMPERATURE, raw, "not a number"))?;
    if !(0.0..=2.0).contains(&t) {
        return Err(invalid(ENV_TEMPERATURE, raw, "must be between 0 and 2"));
    }
    Ok(t)
}

fn parse_max_tokens(raw: &str) -> Result<u32> {
    let n: u32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(ENV_MAX_TOKENS, raw, "not a positive integer"))?;
    if n == 0 {
        return Err(invalid(ENV_MAX_TOKENS, raw, "must be greater than 0"));
    }
    Ok(n)
}
