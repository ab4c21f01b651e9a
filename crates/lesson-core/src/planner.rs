use lesson_llm::{ChatMessage, ChatModel, ChatRequest, LlmError, ResponseFormat};
use serde::Serialize;
use tracing::Instrument;

use crate::config::ModelSettings;
use crate::error::{LessonError, Result};
use crate::hours::requested_hours;
use crate::lenient::Lenient;
use crate::plan::{parse_plan, LessonPlan};
use crate::{prompt, schema};

// ─── Outcome types ────────────────────────────────────────────────────────

/// What the repair step did for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepairOutcome {
    /// No target hour count, or every flow slot already had text.
    NotNeeded,
    /// Every gap was filled.
    Filled,
    /// The repair call answered but left some gaps blank.
    Partial,
    /// The repair call itself failed; the gaps stay blank.
    Failed,
}

impl RepairOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairOutcome::NotNeeded => "not-needed",
            RepairOutcome::Filled => "filled",
            RepairOutcome::Partial => "partial",
            RepairOutcome::Failed => "failed",
        }
    }
}

/// A finished generation plus the diagnostics the HTTP layer reports.
#[derive(Debug, Clone)]
pub struct Generation {
    pub plan: LessonPlan,
    pub model: String,
    /// Hour count parsed from the prompt, if it stated one.
    pub requested_hours: Option<u32>,
    /// Hour count the flow was completed against; 0 when none was known.
    pub target_hours: u32,
    pub repair: RepairOutcome,
    /// `true` when the schema-constrained call failed and json_object mode was used.
    pub used_fallback: bool,
}

/// Prompt hours win over the model's own count; 0 means "nothing to complete".
pub fn target_hours(requested: Option<u32>, stated: Option<u32>) -> u32 {
    requested
        .filter(|n| *n > 0)
        .or(stated.filter(|n| *n > 0))
        .unwrap_or(0)
}

// ─── Planner ──────────────────────────────────────────────────────────────

/// Drives one prompt through generation, flow completion and repair.
///
/// Makes at most two model calls on the happy path (primary + repair) and at
/// most three when the primary call fails (primary + fallback + repair).
pub struct Planner<'a> {
    model: &'a dyn ChatModel,
    settings: &'a ModelSettings,
}

impl<'a> Planner<'a> {
    pub fn new(model: &'a dyn ChatModel, settings: &'a ModelSettings) -> Self {
        Self { model, settings }
    }

    /// Generate a lesson plan for `prompt`.
    ///
    /// Fails with [`LessonError::EmptyPrompt`] before any model call when the
    /// prompt is blank, and with [`LessonError::Generation`] only when both the
    /// schema-constrained call and its json_object fallback fail.
    pub async fn generate(&self, prompt: &str) -> Result<Generation> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(LessonError::EmptyPrompt);
        }

        let generation_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("generate", %generation_id, model = %self.settings.model);
        self.run(prompt).instrument(span).await
    }

    async fn run(&self, prompt: &str) -> Result<Generation> {
        let requested = requested_hours(prompt);
        tracing::info!(
            prompt_chars = prompt.chars().count(),
            requested_hours = ?requested,
            "generating lesson plan"
        );

        let system = prompt::system_instruction();
        let strict =
            ResponseFormat::strict_schema(schema::SCHEMA_NAME, schema::lesson_plan_schema(requested));

        let primary = completion_text(self.model.complete(&self.primary(&system, prompt, strict)).await, "primary");
        let (text, used_fallback) = match primary {
            Ok(text) => (text, false),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    transport = err.is_transport(),
                    "schema-constrained call failed; retrying in json_object mode"
                );
                let fallback = self.primary(&system, prompt, ResponseFormat::JsonObject);
                let text = completion_text(self.model.complete(&fallback).await, "fallback").map_err(|err| {
                    tracing::error!(error = %err, "fallback call failed");
                    LessonError::Generation {
                        model: self.settings.model.clone(),
                        message: err.to_string(),
                    }
                })?;
                (text, true)
            }
        };

        let mut plan = read_plan(&text, "primary");
        plan.normalize_names();

        let target = target_hours(requested, plan.stated_hours());
        let repair = if target == 0 {
            tracing::info!("no hour count in prompt or completion; flow left as generated");
            RepairOutcome::NotNeeded
        } else {
            plan.flow.ensure_hours(target);
            plan.hours = Some(Lenient::Read(target));
            let gaps = plan.flow.gaps();
            if gaps.is_empty() {
                RepairOutcome::NotNeeded
            } else {
                self.repair(&mut plan, prompt, target, &gaps).await
            }
        };

        tracing::info!(
            target_hours = target,
            repair = repair.as_str(),
            used_fallback,
            "lesson plan ready"
        );

        Ok(Generation {
            plan,
            model: self.settings.model.clone(),
            requested_hours: requested,
            target_hours: target,
            repair,
            used_fallback,
        })
    }

    fn primary(&self, system: &str, prompt: &str, response_format: ResponseFormat) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            response_format,
        }
    }

    /// One targeted call for the blank slots. Only `gaps` are merged back.
    async fn repair(
        &self,
        plan: &mut LessonPlan,
        prompt: &str,
        target: u32,
        gaps: &[String],
    ) -> RepairOutcome {
        tracing::info!(missing = gaps.len(), target_hours = target, "repairing lesson flow");

        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(prompt::repair_instruction(gaps)),
                ChatMessage::user(prompt::repair_user_message(plan, prompt, gaps)),
            ],
            temperature: self.settings.repair_temperature(),
            max_tokens: self.settings.repair_max_tokens(),
            response_format: ResponseFormat::JsonObject,
        };

        let text = match completion_text(self.model.complete(&request).await, "repair") {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "repair call failed; keeping blank flow entries");
                return RepairOutcome::Failed;
            }
        };

        let mut repaired = read_plan(&text, "repair");
        repaired.normalize_names();
        repaired.flow.ensure_hours(target);

        let filled = plan.flow.merge_repaired(&repaired.flow, gaps);
        if filled == gaps.len() {
            RepairOutcome::Filled
        } else {
            tracing::info!(
                filled,
                remaining = gaps.len() - filled,
                "repair left some flow entries blank"
            );
            RepairOutcome::Partial
        }
    }
}

/// An answered call with no content is an unusable completion, not a failed
/// call: it goes to [`read_plan`] as empty text instead of down the error path.
fn completion_text(
    result: lesson_llm::Result<String>,
    stage: &'static str,
) -> lesson_llm::Result<String> {
    match result {
        Err(LlmError::EmptyResponse) => {
            tracing::warn!(stage, "model answered with no completion text");
            Ok(String::new())
        }
        other => other,
    }
}

/// Parse a completion, degrading to an empty document when it is unusable.
fn read_plan(text: &str, stage: &'static str) -> LessonPlan {
    match parse_plan(text) {
        Ok(plan) => plan,
        Err(failure) => {
            tracing::warn!(stage, error = %failure, "completion unusable; continuing with an empty document");
            LessonPlan::default()
        }
    }
}
