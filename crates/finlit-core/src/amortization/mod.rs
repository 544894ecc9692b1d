//! Level-payment amortization schedules.
//!
//! Builds period-by-period schedules for fixed-rate instalment loans and
//! replays them with one-time extra payments to show payoff acceleration.

pub mod early_payoff;
pub mod schedule;

pub use early_payoff::{apply_lump_sum, LumpSumInput, LumpSumOutput};
pub use schedule::{build_amortization, AmortizationSchedule};

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::FinlitError;
use crate::types::{Money, Percent};
use crate::FinlitResult;

/// Hard ceiling on schedule length. Keeps replay loops bounded even when a
/// pathological input slips past validation.
pub const MAX_SCHEDULE_PERIODS: u32 = 360;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount financed.
    pub principal: Money,
    /// Annual nominal rate, in percent (4.5 means 4.5% APR).
    pub annual_rate_pct: Percent,
    pub term_months: u32,
    /// When set, each row carries a due date one month apart.
    #[serde(default)]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based payment number.
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Balance remaining after this payment.
    pub balance: Money,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Round to whole cents, half away from zero (statement convention).
pub(crate) fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn validate_terms(terms: &LoanTerms) -> FinlitResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(FinlitError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if terms.annual_rate_pct < Decimal::ZERO {
        return Err(FinlitError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    if terms.term_months == 0 {
        return Err(FinlitError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if terms.term_months > MAX_SCHEDULE_PERIODS {
        return Err(FinlitError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Term cannot exceed {MAX_SCHEDULE_PERIODS} months"),
        });
    }
    Ok(())
}

/// Due date for a 1-based period, one calendar month per period.
pub(crate) fn period_date(
    first_payment_date: Option<NaiveDate>,
    period: u32,
) -> FinlitResult<Option<NaiveDate>> {
    match first_payment_date {
        None => Ok(None),
        Some(first) => first
            .checked_add_months(Months::new(period - 1))
            .map(Some)
            .ok_or_else(|| {
                FinlitError::DateError(format!(
                    "Payment date overflow at period {period} from {first}"
                ))
            }),
    }
}
