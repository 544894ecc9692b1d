use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finlit_core::grading::{grade_answers, GradeInput, GradeItem};

use crate::input;

/// Arguments for answer grading
#[derive(Args)]
pub struct GradeArgs {
    /// Path to a JSON/YAML file with a batch of answers
    #[arg(long)]
    pub input: Option<String>,

    /// Learner submission, exactly as typed (e.g. "$449.13")
    #[arg(long, allow_hyphen_values = true)]
    pub submitted: Option<String>,

    /// Reference value to grade against
    #[arg(long, allow_hyphen_values = true)]
    pub expected: Option<Decimal>,

    /// Relative tolerance in percent (engine default when omitted)
    #[arg(long)]
    pub tolerance: Option<Decimal>,
}

pub fn run_grade(args: GradeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let batch: GradeInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        GradeInput {
            answers: vec![GradeItem {
                id: "answer".to_string(),
                submitted: args
                    .submitted
                    .ok_or("--submitted is required (or provide --input)")?,
                expected: args
                    .expected
                    .ok_or("--expected is required (or provide --input)")?,
                tolerance_pct: args.tolerance,
            }],
            default_tolerance_pct: None,
        }
    };

    Ok(serde_json::to_value(grade_answers(&batch)?)?)
}
