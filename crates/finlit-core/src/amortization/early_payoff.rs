use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::schedule::{build_rows, summarize, AmortizationSchedule};
use super::{period_date, round_cents, validate_terms, AmortizationRow, LoanTerms, MAX_SCHEDULE_PERIODS};
use crate::error::FinlitError;
use crate::time_value::monthly_rate;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumInput {
    pub terms: LoanTerms,
    /// One-time extra principal, paid on top of the scheduled payment.
    pub extra_amount: Money,
    /// 1-based period the extra payment lands in.
    pub at_period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumOutput {
    /// Revised schedule; the monthly payment stays the same, the term shrinks.
    pub schedule: AmortizationSchedule,
    pub payoff_period: u32,
    pub months_saved: u32,
    pub baseline_total_interest: Money,
    pub interest_saved: Money,
}

// ---------------------------------------------------------------------------
// Lump-sum replay
// ---------------------------------------------------------------------------

/// Replay a loan schedule with a one-time extra principal payment.
///
/// The monthly payment is kept fixed, so the extra principal shortens the
/// term rather than lowering the payment. Savings are reported against the
/// untouched baseline schedule.
pub fn apply_lump_sum(input: &LumpSumInput) -> FinlitResult<ComputationOutput<LumpSumOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    validate_terms(&input.terms)?;
    if input.extra_amount <= Decimal::ZERO {
        return Err(FinlitError::InvalidInput {
            field: "extra_amount".into(),
            reason: "Extra payment must be positive".into(),
        });
    }
    if input.at_period == 0 || input.at_period > input.terms.term_months {
        return Err(FinlitError::InvalidInput {
            field: "at_period".into(),
            reason: format!(
                "Period must be between 1 and {}",
                input.terms.term_months
            ),
        });
    }

    let rate = monthly_rate(input.terms.annual_rate_pct);
    let (payment, baseline_rows) = build_rows(&input.terms)?;
    let baseline_total_interest: Money = baseline_rows.iter().map(|row| row.interest).sum();

    let mut rows: Vec<AmortizationRow> = Vec::with_capacity(baseline_rows.len());
    let mut balance = input.terms.principal;
    let mut period: u32 = 0;

    while balance > Decimal::ZERO {
        period += 1;
        if period > MAX_SCHEDULE_PERIODS {
            return Err(FinlitError::ConvergenceFailure {
                function: "apply_lump_sum".into(),
                iterations: MAX_SCHEDULE_PERIODS,
                last_delta: balance,
            });
        }

        let interest = round_cents(balance * rate);
        let extra = if period == input.at_period {
            input.extra_amount
        } else {
            Decimal::ZERO
        };
        let scheduled = payment + extra;

        if scheduled <= interest {
            // Balance would never fall; refuse to spin out the schedule
            return Err(FinlitError::ConvergenceFailure {
                function: "apply_lump_sum".into(),
                iterations: period,
                last_delta: balance,
            });
        }

        let tentative_principal = scheduled - interest;
        let (row_payment, principal_component) = if tentative_principal >= balance {
            if period == input.at_period && tentative_principal > balance {
                warnings.push(format!(
                    "Lump sum exceeded the remaining balance of {balance}; the unused portion is not collected"
                ));
            }
            (balance + interest, balance)
        } else {
            (scheduled, tentative_principal)
        };
        balance -= principal_component;

        rows.push(AmortizationRow {
            period,
            date: period_date(input.terms.first_payment_date, period)?,
            payment: row_payment,
            interest,
            principal: principal_component,
            balance,
        });
    }

    let payoff_period = period;
    let months_saved = input.terms.term_months.saturating_sub(payoff_period);
    if months_saved == 0 {
        warnings.push(
            "Extra payment reduced the final payment but did not shorten the term".to_string(),
        );
    }

    let schedule = summarize(payment, rows);
    let interest_saved = baseline_total_interest - schedule.total_interest;

    let output = LumpSumOutput {
        schedule,
        payoff_period,
        months_saved,
        baseline_total_interest,
        interest_saved,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "One-time extra principal replayed against the level-payment schedule (payment held fixed, term shortened)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
