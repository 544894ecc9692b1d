use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::statistics::{normalize_allocations, portfolio_variance, validate_portfolio, PortfolioInput};
use crate::error::FinlitError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::FinlitResult;

/// Loss multiple of one standard deviation at 95% confidence. These are
/// teaching-grade approximations of historical tail behavior, not fitted
/// quantiles.
const LOSS_MULTIPLIER_95: Decimal = dec!(1.8);
/// Loss multiple at 99% confidence.
const LOSS_MULTIPLIER_99: Decimal = dec!(2.3);
/// Expected shortfall scaling over VaR.
const CVAR_SCALE: Decimal = dec!(1.25);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownsideOutput {
    pub std_dev_pct: Percent,
    /// Potential annual loss at 95% confidence, as a positive percent.
    pub var_95_pct: Percent,
    pub var_99_pct: Percent,
    /// Average loss beyond VaR, approximated as VaR x 1.25.
    pub cvar_95_pct: Percent,
    pub cvar_99_pct: Percent,
}

/// Loss multiplier for a supported confidence level (percent).
pub fn loss_multiplier(confidence_pct: Decimal) -> FinlitResult<Decimal> {
    if confidence_pct == dec!(95) {
        return Ok(LOSS_MULTIPLIER_95);
    }
    if confidence_pct == dec!(99) {
        return Ok(LOSS_MULTIPLIER_99);
    }
    Err(FinlitError::InvalidInput {
        field: "confidence_pct".into(),
        reason: "Supported confidence levels are 95 and 99".into(),
    })
}

/// Downside risk summary: VaR and CVaR at both supported confidence
/// levels, derived from the portfolio standard deviation.
pub fn downside_risk(input: &PortfolioInput) -> FinlitResult<ComputationOutput<DownsideOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let n = input.assets.len();
    validate_portfolio(input, n)?;
    let weights = normalize_allocations(&input.assets)?;

    let std_devs: Vec<Decimal> = input.assets.iter().map(|a| a.std_dev_pct).collect();
    let variance = portfolio_variance(&weights, &std_devs, &input.correlations);
    let std_dev_pct = sqrt_decimal(variance);

    if std_dev_pct.is_zero() {
        warnings.push("Zero-risk portfolio: all downside measures are zero".to_string());
    }

    let var_95_pct = LOSS_MULTIPLIER_95 * std_dev_pct;
    let var_99_pct = LOSS_MULTIPLIER_99 * std_dev_pct;

    let output = DownsideOutput {
        std_dev_pct,
        var_95_pct,
        var_99_pct,
        cvar_95_pct: var_95_pct * CVAR_SCALE,
        cvar_99_pct: var_99_pct * CVAR_SCALE,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Downside approximation: VaR as a fixed multiple of portfolio sigma (1.8 at 95%, 2.3 at 99%), CVaR as VaR x 1.25",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn sqrt_decimal(val: Decimal) -> Decimal {
    if val <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    val.sqrt().unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
