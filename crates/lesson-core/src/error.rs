use thiserror::Error;

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("prompt is required")]
    EmptyPrompt,

    #[error("lesson plan generation failed ({model}): {message}")]
    Generation { model: String, message: String },

    #[error("invalid setting {name}='{value}': {reason}")]
    InvalidSetting {
        name: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, LessonError>;
