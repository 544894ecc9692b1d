//! Tolerance-based answer grading.
//!
//! Exercises publish rounded reference values, so learner submissions are
//! graded within a relative tolerance band rather than on exact equality.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinlitError;
use crate::types::{with_metadata, ComputationOutput};
use crate::FinlitResult;

/// Relative tolerance applied when an answer does not specify its own.
pub const DEFAULT_TOLERANCE_PCT: Decimal = dec!(2);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeItem {
    /// Exercise-local identifier, echoed back in the result.
    pub id: String,
    /// Learner submission, exactly as typed.
    pub submitted: String,
    /// Reference value the exercise was built around.
    pub expected: Decimal,
    /// Per-item tolerance override (percent).
    #[serde(default)]
    pub tolerance_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeInput {
    pub answers: Vec<GradeItem>,
    /// Tolerance applied to items without their own (percent).
    #[serde(default)]
    pub default_tolerance_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResult {
    pub id: String,
    pub correct: bool,
    /// Parsed submission, if it parsed at all.
    pub submitted_value: Option<Decimal>,
    pub expected: Decimal,
    /// |submitted - expected| / |expected| * 100, when defined.
    pub relative_error_pct: Option<Decimal>,
    pub tolerance_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeOutput {
    pub results: Vec<GradeResult>,
    pub correct_count: u32,
    pub total_count: u32,
    pub percent_correct: Decimal,
}

// ---------------------------------------------------------------------------
// Core grading
// ---------------------------------------------------------------------------

/// Check a numeric submission against a reference value.
///
/// Passing means |submitted - reference| <= |reference| * tolerance / 100,
/// boundary inclusive. A zero reference admits only an exactly zero
/// submission, since relative error is undefined there.
pub fn grade(submitted: Decimal, reference: Decimal, tolerance_pct: Decimal) -> bool {
    if reference.is_zero() {
        return submitted.is_zero();
    }
    let band = reference.abs() * tolerance_pct / dec!(100);
    (submitted - reference).abs() <= band
}

/// Grade a raw submission string. Unparseable input fails closed.
///
/// Leading `$`, thousands separators, and surrounding whitespace are
/// stripped before parsing, matching what learners actually type.
pub fn grade_input(submitted: &str, reference: Decimal, tolerance_pct: Decimal) -> bool {
    match parse_submission(submitted) {
        Some(value) => grade(value, reference, tolerance_pct),
        None => false,
    }
}

fn parse_submission(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

// ---------------------------------------------------------------------------
// Batch API
// ---------------------------------------------------------------------------

/// Grade a batch of submissions and summarize the score.
pub fn grade_answers(input: &GradeInput) -> FinlitResult<ComputationOutput<GradeOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.answers.is_empty() {
        return Err(FinlitError::InsufficientData(
            "At least one answer is required".into(),
        ));
    }

    let default_tolerance = input.default_tolerance_pct.unwrap_or(DEFAULT_TOLERANCE_PCT);
    validate_tolerance("default_tolerance_pct", default_tolerance)?;

    let mut results = Vec::with_capacity(input.answers.len());
    let mut correct_count: u32 = 0;

    for item in &input.answers {
        let tolerance = item.tolerance_pct.unwrap_or(default_tolerance);
        validate_tolerance(&format!("answers[{}].tolerance_pct", item.id), tolerance)?;
        if tolerance > dec!(10) {
            warnings.push(format!(
                "Answer '{}' graded at {tolerance}% tolerance; wide bands can mask conceptual errors",
                item.id
            ));
        }

        let submitted_value = parse_submission(&item.submitted);
        let correct = match submitted_value {
            Some(value) => grade(value, item.expected, tolerance),
            None => false,
        };
        if submitted_value.is_none() {
            warnings.push(format!(
                "Answer '{}' did not parse as a number and was marked incorrect",
                item.id
            ));
        }
        if correct {
            correct_count += 1;
        }

        let relative_error_pct = submitted_value.and_then(|value| {
            if item.expected.is_zero() {
                None
            } else {
                Some((value - item.expected).abs() / item.expected.abs() * dec!(100))
            }
        });

        results.push(GradeResult {
            id: item.id.clone(),
            correct,
            submitted_value,
            expected: item.expected,
            relative_error_pct,
            tolerance_pct: tolerance,
        });
    }

    let total_count = results.len() as u32;
    let percent_correct =
        Decimal::from(correct_count) / Decimal::from(total_count) * dec!(100);

    let output = GradeOutput {
        results,
        correct_count,
        total_count,
        percent_correct,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Relative-error grading (inclusive band, fail closed on parse errors)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_tolerance(field: &str, tolerance_pct: Decimal) -> FinlitResult<()> {
    if tolerance_pct < Decimal::ZERO {
        return Err(FinlitError::InvalidInput {
            field: field.to_string(),
            reason: "Tolerance cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
