pub mod config;
pub mod error;
pub mod flow;
pub mod hours;
pub mod lenient;
pub mod plan;
pub mod planner;
pub mod prompt;
pub mod schema;

pub use config::ModelSettings;
pub use error::{LessonError, Result};
pub use flow::{FlowEntry, LessonFlow};
pub use lenient::Lenient;
pub use plan::{parse_plan, EvaluationViewpoints, LessonPlan, ParseFailure};
pub use planner::{Generation, Planner, RepairOutcome};
