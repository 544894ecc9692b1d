use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::FinlitError;
use crate::types::{Money, Percent, Rate};
use crate::FinlitResult;

/// Periodic rate for a monthly payment schedule: APR% / 100 / 12.
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound_factor(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Compute (1 - r)^n via iterative multiplication.
pub fn decay_factor(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE - rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Fixed payment for a fully amortizing loan (standard annuity PMT).
///
/// Zero-rate loans fall back to equal principal instalments.
pub fn annuity_payment(
    principal: Money,
    periodic_rate: Rate,
    term_months: u32,
) -> FinlitResult<Money> {
    if term_months == 0 {
        return Err(FinlitError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if periodic_rate < Decimal::ZERO {
        return Err(FinlitError::InvalidInput {
            field: "periodic_rate".into(),
            reason: "Rate cannot be negative".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let factor = compound_factor(periodic_rate, term_months);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(FinlitError::DivisionByZero {
            context: "annuity payment factor".into(),
        });
    }

    Ok(principal * periodic_rate * factor / denominator)
}

/// Loan principal that a given fixed payment fully amortizes (inverse PMT).
///
/// The affordability exercises use this to turn a monthly budget into a
/// maximum amount financed.
pub fn principal_for_payment(
    payment: Money,
    periodic_rate: Rate,
    term_months: u32,
) -> FinlitResult<Money> {
    if term_months == 0 {
        return Err(FinlitError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if periodic_rate < Decimal::ZERO {
        return Err(FinlitError::InvalidInput {
            field: "periodic_rate".into(),
            reason: "Rate cannot be negative".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(payment * Decimal::from(term_months));
    }

    let factor = compound_factor(periodic_rate, term_months);
    let denominator = periodic_rate * factor;
    if denominator.is_zero() {
        return Err(FinlitError::DivisionByZero {
            context: "inverse annuity factor".into(),
        });
    }

    Ok(payment * (factor - Decimal::ONE) / denominator)
}
