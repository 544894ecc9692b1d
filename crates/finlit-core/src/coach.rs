//! Scripted study coach for the exercises.
//!
//! A deterministic keyword-to-reply lookup. There is no language model
//! here and none should be assumed: the first rule whose keyword appears
//! in the learner's message wins, and a fixed fallback covers everything
//! else.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinlitError;
use crate::types::{with_metadata, ComputationOutput};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Learner,
    Coach,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// One scripted response: fires when any keyword appears in the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachRule {
    pub keywords: Vec<String>,
    pub reply: String,
}

/// An ordered rule list with a fallback. Earlier rules win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachScript {
    pub rules: Vec<CoachRule>,
    pub fallback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachInput {
    /// Conversation so far; the reply targets the latest learner turn.
    pub history: Vec<ChatTurn>,
    /// Override for the built-in script.
    #[serde(default)]
    pub script: Option<CoachScript>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachReply {
    pub reply: String,
    /// Keyword that selected the reply; absent when the fallback fired.
    pub matched_keyword: Option<String>,
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

impl CoachScript {
    /// First matching reply for a message, case-insensitive substring
    /// match, falling back to the script's default line.
    pub fn reply(&self, message: &str) -> (&str, Option<&str>) {
        let lowered = message.to_lowercase();
        for rule in &self.rules {
            for keyword in &rule.keywords {
                if lowered.contains(&keyword.to_lowercase()) {
                    return (&rule.reply, Some(keyword.as_str()));
                }
            }
        }
        (&self.fallback, None)
    }
}

impl Default for CoachScript {
    fn default() -> Self {
        let rule = |keywords: &[&str], reply: &str| CoachRule {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            reply: reply.to_string(),
        };
        CoachScript {
            rules: vec![
                rule(
                    &["payment", "monthly"],
                    "Your monthly payment depends on three things: the amount financed, the APR, and the term. Try shrinking the amount financed first; it is the lever you control at signing.",
                ),
                rule(
                    &["interest", "apr", "rate"],
                    "APR is the yearly cost of borrowing. Each month you pay one twelfth of it on whatever balance remains, so early payments are mostly interest and late payments are mostly principal.",
                ),
                rule(
                    &["down payment", "trade-in", "trade in", "rebate"],
                    "Down payments, trade-ins, and rebates all reduce the amount financed, and a trade-in usually shrinks the taxable amount too. Less financed means less interest over the life of the loan.",
                ),
                rule(
                    &["depreciation", "resale"],
                    "Cars lose value by a roughly constant percentage each year, so the dollar loss is biggest in year one. Compare the depreciation line to your interest line; it is often the larger cost.",
                ),
                rule(
                    &["diversif", "correlation"],
                    "Diversification works because assets that do not move together partially cancel each other's swings. Look at the correlation matrix: pairs below 1 are where the risk reduction comes from.",
                ),
                rule(
                    &["sharpe"],
                    "The Sharpe ratio is return earned per unit of risk, above the risk-free rate. A higher Sharpe means the portfolio is working more efficiently, not necessarily earning more.",
                ),
                rule(
                    &["value at risk", "drawdown", "crash"],
                    "Value at Risk estimates how bad a bad year could get at a chosen confidence level. It is a planning number, not a guarantee; real crises can overshoot it.",
                ),
                rule(
                    &["risk", "volatility", "standard deviation", "variance"],
                    "Risk here means how widely returns swing around their average, measured by standard deviation. Two portfolios with the same expected return can feel very different to hold.",
                ),
                rule(
                    &["budget", "afford"],
                    "Work backwards from the monthly payment you can sustain. The inverse of the payment formula tells you the largest loan that payment supports at a given rate and term.",
                ),
            ],
            fallback: "I can help with loan payments, total cost of ownership, diversification, \
                       and portfolio risk. Try asking about one of the numbers on screen."
                .to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Reply to the latest learner turn in the conversation.
pub fn coach_reply(input: &CoachInput) -> FinlitResult<ComputationOutput<CoachReply>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let last_learner = input
        .history
        .iter()
        .rev()
        .find(|turn| turn.role == Role::Learner)
        .ok_or_else(|| {
            FinlitError::InsufficientData("No learner message to respond to".into())
        })?;

    let default_script;
    let script = match &input.script {
        Some(script) => script,
        None => {
            default_script = CoachScript::default();
            &default_script
        }
    };

    let (reply, matched_keyword) = script.reply(&last_learner.content);
    if matched_keyword.is_none() {
        warnings.push("No keyword matched; fallback reply used".to_string());
    }

    let output = CoachReply {
        reply: reply.to_string(),
        matched_keyword: matched_keyword.map(|k| k.to_string()),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Scripted keyword lookup over the latest learner message (first match wins)",
        &serde_json::json!({
            "history_turns": input.history.len(),
            "custom_script": input.script.is_some(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
