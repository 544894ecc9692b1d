use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::round_cents;
use crate::error::FinlitError;
use crate::time_value::decay_factor;
use crate::types::{percent_to_rate, Money, Percent};
use crate::FinlitResult;

/// Longest supported holding period. Bounds the schedule the same way
/// [`crate::amortization::MAX_SCHEDULE_PERIODS`] bounds loan replays.
pub const MAX_HORIZON_YEARS: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationRow {
    /// Years since purchase, starting at 1.
    pub year: u32,
    /// Estimated value at the end of the year.
    pub value: Money,
    /// Cumulative value lost since purchase.
    pub loss_to_date: Money,
}

/// Estimated value after `years` of compound annual decay:
/// price x (1 - rate)^years.
pub fn value_after(price: Money, rate_pct: Percent, years: u32) -> FinlitResult<Money> {
    validate(price, rate_pct, years)?;
    Ok(round_cents(
        price * decay_factor(percent_to_rate(rate_pct), years),
    ))
}

/// Year-end value table over the holding period.
pub fn depreciation_schedule(
    price: Money,
    rate_pct: Percent,
    years: u32,
) -> FinlitResult<Vec<DepreciationRow>> {
    validate(price, rate_pct, years)?;

    let decay = Decimal::ONE - percent_to_rate(rate_pct);
    let mut rows = Vec::with_capacity(years as usize);
    let mut value = price;
    for year in 1..=years {
        value = round_cents(value * decay);
        rows.push(DepreciationRow {
            year,
            value,
            loss_to_date: price - value,
        });
    }
    Ok(rows)
}

fn validate(price: Money, rate_pct: Percent, years: u32) -> FinlitResult<()> {
    if price < Decimal::ZERO {
        return Err(FinlitError::InvalidInput {
            field: "price".into(),
            reason: "Value cannot be negative".into(),
        });
    }
    if rate_pct < Decimal::ZERO || rate_pct >= dec!(100) {
        return Err(FinlitError::InvalidInput {
            field: "depreciation_rate_pct".into(),
            reason: "Rate must be in [0, 100)".into(),
        });
    }
    if years > MAX_HORIZON_YEARS {
        return Err(FinlitError::InvalidInput {
            field: "years".into(),
            reason: format!("Horizon cannot exceed {MAX_HORIZON_YEARS} years"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_after_known_decay() {
        // 20000 * 0.85^2 = 14450
        assert_eq!(value_after(dec!(20000), dec!(15), 2).unwrap(), dec!(14450));
    }

    #[test]
    fn test_value_after_zero_years_is_price() {
        assert_eq!(value_after(dec!(20000), dec!(15), 0).unwrap(), dec!(20000));
    }

    #[test]
    fn test_zero_rate_holds_value() {
        assert_eq!(value_after(dec!(20000), dec!(0), 5).unwrap(), dec!(20000));
    }

    #[test]
    fn test_schedule_matches_closed_form() {
        let rows = depreciation_schedule(dec!(20000), dec!(15), 3).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].value, dec!(17000));
        assert_eq!(rows[1].value, dec!(14450));
        assert_eq!(rows[2].value, dec!(12282.50));
        assert_eq!(rows[2].loss_to_date, dec!(7717.50));
    }

    #[test]
    fn test_schedule_values_decreasing() {
        let rows = depreciation_schedule(dec!(26500), dec!(12), 8).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[1].value <= pair[0].value);
        }
    }

    #[test]
    fn test_full_rate_rejected() {
        assert!(value_after(dec!(20000), dec!(100), 2).is_err());
        assert!(value_after(dec!(20000), dec!(-5), 2).is_err());
    }

    #[test]
    fn test_horizon_cap() {
        assert!(value_after(dec!(20000), dec!(15), MAX_HORIZON_YEARS).is_ok());
        assert!(value_after(dec!(20000), dec!(15), MAX_HORIZON_YEARS + 1).is_err());
        assert!(depreciation_schedule(dec!(20000), dec!(15), 51).is_err());
    }
}
