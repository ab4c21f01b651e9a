use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lesson_core::{LessonError, Planner};

use super::ModelArgs;
use crate::output::{print_json, print_report};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Requirements text (textbook, grade, genre, material, 【授業時間数】N)
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub prompt: Option<String>,

    /// Read the requirements text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Print hour resolution, repair and fallback status to stderr
    #[arg(long)]
    pub report: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let prompt = match (args.prompt, &args.file) {
        (Some(p), _) => p,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt from {}", path.display()))?,
        (None, None) => String::new(),
    };
    if prompt.trim().is_empty() {
        return Err(LessonError::EmptyPrompt.into());
    }

    let settings = args.model.settings()?;
    let client = args.model.client()?;

    let rt = tokio::runtime::Runtime::new()?;
    let generation = rt.block_on(Planner::new(&client, &settings).generate(&prompt))?;

    if args.report {
        print_report(&generation);
    }
    print_json(&generation.plan)
}
