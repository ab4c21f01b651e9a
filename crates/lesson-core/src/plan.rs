use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::flow::LessonFlow;
use crate::lenient::{self, Lenient};

/// JSON keys of the lesson-plan document.
pub mod keys {
    pub const TEXTBOOK: &str = "教科書名";
    pub const GRADE: &str = "学年";
    pub const GENRE: &str = "ジャンル";
    /// Canonical material-name key.
    pub const MATERIAL: &str = "教材名";
    /// Legacy alias of [`MATERIAL`], kept in sync for older readers.
    pub const UNIT_NAME: &str = "単元名";
    pub const HOURS: &str = "授業時間数";
    pub const UNIT_GOAL: &str = "単元の目標";
    pub const EVALUATION: &str = "評価の観点";
    pub const DISPOSITION: &str = "育てたい子どもの姿";
    pub const FLOW: &str = "授業の流れ";
    pub const LANGUAGE_ACTIVITIES: &str = "言語活動の工夫";
    pub const RESULT: &str = "結果";

    pub const EVAL_KNOWLEDGE: &str = "知識・技能";
    pub const EVAL_THINKING: &str = "思考・判断・表現";
    pub const EVAL_ATTITUDE: &str = "主体的に学習に取り組む態度";

    pub const GRADES: [&str; 6] = ["1年", "2年", "3年", "4年", "5年", "6年"];
}

// ---------------------------------------------------------------------------
// EvaluationViewpoints
// ---------------------------------------------------------------------------

/// The three fixed `評価の観点` sub-keys, each a list of observable behaviours.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationViewpoints {
    #[serde(rename = "知識・技能")]
    pub knowledge: Vec<String>,
    #[serde(rename = "思考・判断・表現")]
    pub thinking: Vec<String>,
    #[serde(rename = "主体的に学習に取り組む態度")]
    pub attitude: Vec<String>,
}

impl EvaluationViewpoints {
    /// Read from an object; each sub-key may be a string or a list of strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let list = |key: &str| map.get(key).map(lenient::string_list).unwrap_or_default();
        Some(Self {
            knowledge: list(keys::EVAL_KNOWLEDGE),
            thinking: list(keys::EVAL_THINKING),
            attitude: list(keys::EVAL_ATTITUDE),
        })
    }
}

fn de_evaluation<'de, D>(
    deserializer: D,
) -> Result<Option<Lenient<EvaluationViewpoints>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Lenient::read_with(
        Value::deserialize(deserializer)?,
        EvaluationViewpoints::from_value,
    )))
}

// ---------------------------------------------------------------------------
// LessonPlan
// ---------------------------------------------------------------------------

/// A generated lesson plan.
///
/// Every field is optional because the model may omit any of them; keys the
/// model adds beyond the known set are carried in `extra` untouched, and
/// hour counts or viewpoints that cannot be read stay as [`Lenient::Raw`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    #[serde(
        rename = "教科書名",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub textbook: Option<String>,

    #[serde(
        rename = "学年",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade: Option<String>,

    #[serde(
        rename = "ジャンル",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre: Option<String>,

    #[serde(
        rename = "教材名",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub material: Option<String>,

    #[serde(
        rename = "単元名",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_name: Option<String>,

    #[serde(
        rename = "授業時間数",
        default,
        deserialize_with = "lenient::de_hours",
        skip_serializing_if = "Option::is_none"
    )]
    pub hours: Option<Lenient<u32>>,

    #[serde(
        rename = "単元の目標",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_goal: Option<String>,

    #[serde(
        rename = "評価の観点",
        default,
        deserialize_with = "de_evaluation",
        skip_serializing_if = "Option::is_none"
    )]
    pub evaluation: Option<Lenient<EvaluationViewpoints>>,

    #[serde(
        rename = "育てたい子どもの姿",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub disposition: Option<String>,

    #[serde(rename = "授業の流れ", default, skip_serializing_if = "LessonFlow::is_empty")]
    pub flow: LessonFlow,

    #[serde(
        rename = "言語活動の工夫",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub language_activities: Option<String>,

    #[serde(
        rename = "結果",
        default,
        deserialize_with = "lenient::de_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl LessonPlan {
    /// Bring `教材名` and `単元名` into agreement.
    ///
    /// Whichever key arrived non-empty backfills the other; when both are
    /// set and differ, the canonical key wins.
    pub fn normalize_names(&mut self) {
        let canonical = non_blank(&self.material).map(str::to_string);
        let legacy = non_blank(&self.unit_name).map(str::to_string);
        match (canonical, legacy) {
            (Some(canonical), legacy) if legacy.as_deref() != Some(canonical.as_str()) => {
                self.unit_name = Some(canonical);
            }
            (None, Some(legacy)) => self.material = Some(legacy),
            _ => {}
        }
    }

    /// The model's own hour count, when it stated a readable one.
    pub fn stated_hours(&self) -> Option<u32> {
        self.hours.as_ref().and_then(Lenient::read).copied()
    }

    pub fn viewpoints(&self) -> Option<&EvaluationViewpoints> {
        self.evaluation.as_ref().and_then(Lenient::read)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Why a completion could not be read as a lesson plan.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("completion is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("completion is JSON but not an object (found {0})")]
    NotAnObject(&'static str),

    #[error("completion object could not be read as a lesson plan: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Parse completion text into a [`LessonPlan`].
///
/// A single surrounding Markdown code fence is stripped first.
pub fn parse_plan(text: &str) -> Result<LessonPlan, ParseFailure> {
    let body = strip_code_fence(text).unwrap_or_else(|| text.trim());
    let value: Value = serde_json::from_str(body).map_err(ParseFailure::Syntax)?;
    if !value.is_object() {
        return Err(ParseFailure::NotAnObject(kind(&value)));
    }
    LessonPlan::deserialize(value).map_err(ParseFailure::Shape)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let without_open = trimmed.strip_prefix("```")?;
    let after_header = match without_open.find('\n') {
        Some(idx) => &without_open[idx + 1..],
        None => without_open,
    };
    let end = after_header.rfind("```")?;
    Some(after_header[..end].trim())
}
