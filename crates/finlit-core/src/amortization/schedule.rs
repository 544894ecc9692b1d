use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{period_date, round_cents, validate_terms, AmortizationRow, LoanTerms};
use crate::time_value::{annuity_payment, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Level monthly payment (the final payment may differ by cents).
    pub payment: Money,
    pub rows: Vec<AmortizationRow>,
    pub total_paid: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Schedule construction
// ---------------------------------------------------------------------------

/// Build the full payment-by-payment schedule for a fixed-rate loan.
///
/// Interest accrues monthly on the open balance; the final payment is
/// adjusted so the schedule closes at exactly zero instead of carrying a
/// few cents of rounding residue.
pub fn build_amortization(
    terms: &LoanTerms,
) -> FinlitResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    validate_terms(terms)?;

    if terms.annual_rate_pct.is_zero() {
        warnings.push("Zero-rate loan: schedule is equal principal instalments".to_string());
    }
    if terms.term_months > 84 {
        warnings.push(format!(
            "Term of {} months is outside the typical 12-84 month instalment range",
            terms.term_months
        ));
    }

    let (payment, rows) = build_rows(terms)?;
    let schedule = summarize(payment, rows);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Level-payment amortization (monthly compounding, final payment closes balance)",
        terms,
        warnings,
        elapsed,
        schedule,
    ))
}

/// Core row loop, shared with the lump-sum replay. Returns the level
/// payment and the per-period rows. Assumes `terms` already validated.
pub(crate) fn build_rows(terms: &LoanTerms) -> FinlitResult<(Money, Vec<AmortizationRow>)> {
    let rate = monthly_rate(terms.annual_rate_pct);
    let payment = round_cents(annuity_payment(terms.principal, rate, terms.term_months)?);

    let mut rows = Vec::with_capacity(terms.term_months as usize);
    let mut balance = terms.principal;

    for period in 1..=terms.term_months {
        let interest = round_cents(balance * rate);
        let (row_payment, principal_component) = if period < terms.term_months {
            (payment, payment - interest)
        } else {
            // Final payment absorbs the rounding residue
            (balance + interest, balance)
        };
        balance -= principal_component;

        rows.push(AmortizationRow {
            period,
            date: period_date(terms.first_payment_date, period)?,
            payment: row_payment,
            interest,
            principal: principal_component,
            balance,
        });
    }

    Ok((payment, rows))
}

pub(crate) fn summarize(payment: Money, rows: Vec<AmortizationRow>) -> AmortizationSchedule {
    let total_paid: Money = rows.iter().map(|row| row.payment).sum();
    let total_interest: Money = rows.iter().map(|row| row.interest).sum();
    AmortizationSchedule {
        payment,
        rows,
        total_paid,
        total_interest,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
