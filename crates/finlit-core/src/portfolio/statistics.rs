use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::error::FinlitError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One holding in an investment universe. Everything is learner-facing
/// percent units: a 7.2% expected return arrives as 7.2, not 0.072.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub id: String,
    pub expected_return_pct: Percent,
    pub std_dev_pct: Percent,
    /// Raw slider allocation; need not sum to 100 across assets.
    pub allocation_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub assets: Vec<AssetEntry>,
    /// N x N correlation matrix, entries in [-1, 1], unit diagonal.
    pub correlations: Vec<Vec<Decimal>>,
    /// When present, a Sharpe ratio is reported.
    #[serde(default)]
    pub risk_free_rate_pct: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskContribution {
    pub id: String,
    pub weight: Decimal,
    /// Simplified marginal contribution: w^2 * sigma^2 / portfolio sigma.
    pub contribution: Decimal,
    pub pct_of_total_risk: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioStatisticsOutput {
    /// Normalized weights, summing to 1, in asset order.
    pub weights: Vec<Decimal>,
    pub expected_return_pct: Percent,
    /// Quadratic form over the covariance matrix, in percent squared.
    pub variance_pct_sq: Decimal,
    pub std_dev_pct: Percent,
    /// Absent when no risk-free rate was supplied or risk is zero.
    pub sharpe_ratio: Option<Decimal>,
    pub risk_contributions: Vec<RiskContribution>,
    /// Herfindahl-Hirschman index of the normalized weights.
    pub hhi_concentration: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Mean-variance statistics for a slider-built portfolio.
///
/// Allocations are rescaled to weights summing to 1 before anything else
/// is computed, so a half-edited universe still grades consistently.
pub fn portfolio_statistics(
    input: &PortfolioInput,
) -> FinlitResult<ComputationOutput<PortfolioStatisticsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let n = input.assets.len();
    validate_portfolio(input, n)?;

    let weights = normalize_allocations(&input.assets)?;
    let total_alloc: Decimal = input.assets.iter().map(|a| a.allocation_pct).sum();
    if (total_alloc - dec!(100)).abs() > dec!(0.01) {
        warnings.push(format!(
            "Allocations sum to {total_alloc}%; weights rescaled to total 1"
        ));
    }

    let returns: Vec<Decimal> = input.assets.iter().map(|a| a.expected_return_pct).collect();
    let std_devs: Vec<Decimal> = input.assets.iter().map(|a| a.std_dev_pct).collect();

    let expected_return_pct = vec_dot(&weights, &returns);
    let variance_pct_sq = portfolio_variance(&weights, &std_devs, &input.correlations);
    let std_dev_pct = sqrt_decimal(variance_pct_sq);

    let sharpe = match input.risk_free_rate_pct {
        Some(rf) if !std_dev_pct.is_zero() => Some((expected_return_pct - rf) / std_dev_pct),
        Some(_) => {
            warnings.push("Sharpe ratio undefined: portfolio risk is zero".to_string());
            None
        }
        None => None,
    };

    let risk_contributions = risk_contributions(&input.assets, &weights, std_dev_pct);

    let hhi_concentration: Decimal = weights.iter().map(|w| *w * *w).sum();

    for (asset, w) in input.assets.iter().zip(weights.iter()) {
        if *w > dec!(0.40) {
            warnings.push(format!(
                "Concentrated holding: {} at weight {:.4}",
                asset.id, w
            ));
        }
    }
    if hhi_concentration > dec!(0.5) {
        warnings.push(format!("High concentration: HHI = {hhi_concentration:.4}"));
    }

    let output = PortfolioStatisticsOutput {
        weights,
        expected_return_pct,
        variance_pct_sq,
        std_dev_pct,
        sharpe_ratio: sharpe,
        risk_contributions,
        hhi_concentration,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Mean-variance statistics over the correlation-derived covariance matrix (percent units)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Rescale raw allocation percentages into weights summing to 1.
pub fn normalize_allocations(assets: &[AssetEntry]) -> FinlitResult<Vec<Decimal>> {
    let total: Decimal = assets.iter().map(|a| a.allocation_pct).sum();
    if total.is_zero() {
        return Err(FinlitError::DivisionByZero {
            context: "allocation normalization: total allocation is zero".into(),
        });
    }
    Ok(assets.iter().map(|a| a.allocation_pct / total).collect())
}

/// Sharpe ratio in percent units: (return - risk-free) / risk.
///
/// Zero risk makes the ratio undefined; that is reported as an error, not
/// smuggled out as infinity or zero.
pub fn sharpe_ratio(
    expected_return_pct: Percent,
    std_dev_pct: Percent,
    risk_free_rate_pct: Percent,
) -> FinlitResult<Decimal> {
    if std_dev_pct.is_zero() {
        return Err(FinlitError::DivisionByZero {
            context: "Sharpe ratio: portfolio risk is zero".into(),
        });
    }
    Ok((expected_return_pct - risk_free_rate_pct) / std_dev_pct)
}

/// Portfolio variance via the quadratic form w' * Sigma * w, with the
/// covariance matrix assembled from correlations and standard deviations.
pub fn portfolio_variance(
    weights: &[Decimal],
    std_devs: &[Decimal],
    correlations: &[Vec<Decimal>],
) -> Decimal {
    let sigma = covariance_from_correlations(std_devs, correlations);
    let sigma_w = mat_vec_multiply(&sigma, weights);
    vec_dot(weights, &sigma_w)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn covariance_from_correlations(
    std_devs: &[Decimal],
    correlations: &[Vec<Decimal>],
) -> Vec<Vec<Decimal>> {
    let n = std_devs.len();
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| correlations[i][j] * std_devs[i] * std_devs[j])
                .collect()
        })
        .collect()
}

/// Simplified per-asset risk contribution (not a full Euler
/// decomposition): w_i^2 * sigma_i^2 / portfolio sigma, reported both raw
/// and as a percent of the total across assets.
fn risk_contributions(
    assets: &[AssetEntry],
    weights: &[Decimal],
    std_dev_pct: Decimal,
) -> Vec<RiskContribution> {
    let raw: Vec<Decimal> = assets
        .iter()
        .zip(weights.iter())
        .map(|(asset, w)| {
            if std_dev_pct.is_zero() {
                Decimal::ZERO
            } else {
                *w * *w * asset.std_dev_pct * asset.std_dev_pct / std_dev_pct
            }
        })
        .collect();
    let total: Decimal = raw.iter().sum();

    assets
        .iter()
        .zip(weights.iter())
        .zip(raw.iter())
        .map(|((asset, w), contribution)| RiskContribution {
            id: asset.id.clone(),
            weight: *w,
            contribution: *contribution,
            pct_of_total_risk: if total.is_zero() {
                Decimal::ZERO
            } else {
                *contribution / total * dec!(100)
            },
        })
        .collect()
}

/// Matrix-vector multiplication.
fn mat_vec_multiply(mat: &[Vec<Decimal>], v: &[Decimal]) -> Vec<Decimal> {
    mat.iter().map(|row| vec_dot(row, v)).collect()
}

/// Dot product.
fn vec_dot(a: &[Decimal], b: &[Decimal]) -> Decimal {
    a.iter().zip(b.iter()).map(|(x, y)| *x * *y).sum()
}

/// Newton-Raphson square root; Decimal has no built-in sqrt path here.
pub(crate) fn sqrt_decimal(val: Decimal) -> Decimal {
    if val <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if val == Decimal::ONE {
        return Decimal::ONE;
    }
    let two = dec!(2);
    let mut guess = val / two;
    if guess.is_zero() {
        guess = dec!(0.0000001);
    }
    for _ in 0..20 {
        if guess.is_zero() {
            return Decimal::ZERO;
        }
        guess = (guess + val / guess) / two;
    }
    guess
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub(crate) fn validate_portfolio(input: &PortfolioInput, n: usize) -> FinlitResult<()> {
    if n == 0 {
        return Err(FinlitError::InsufficientData(
            "Portfolio needs at least one asset".into(),
        ));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(n);
    for asset in &input.assets {
        if !seen.insert(asset.id.as_str()) {
            return Err(FinlitError::InvalidInput {
                field: "assets".into(),
                reason: format!("Duplicate asset id '{}'", asset.id),
            });
        }
        if asset.std_dev_pct < Decimal::ZERO {
            return Err(FinlitError::InvalidInput {
                field: format!("assets[{}].std_dev_pct", asset.id),
                reason: "Standard deviation cannot be negative".into(),
            });
        }
        if asset.allocation_pct < Decimal::ZERO {
            return Err(FinlitError::InvalidInput {
                field: format!("assets[{}].allocation_pct", asset.id),
                reason: "Allocation cannot be negative".into(),
            });
        }
    }

    validate_correlations(&input.correlations, n)
}

fn validate_correlations(correlations: &[Vec<Decimal>], n: usize) -> FinlitResult<()> {
    if correlations.len() != n {
        return Err(FinlitError::InvalidInput {
            field: "correlations".into(),
            reason: format!("Expected {} rows but got {}", n, correlations.len()),
        });
    }
    for (i, row) in correlations.iter().enumerate() {
        if row.len() != n {
            return Err(FinlitError::InvalidInput {
                field: "correlations".into(),
                reason: format!("Row {} has {} entries, expected {}", i, row.len(), n),
            });
        }
        for (j, value) in row.iter().enumerate() {
            if *value < dec!(-1) || *value > dec!(1) {
                return Err(FinlitError::InvalidInput {
                    field: "correlations".into(),
                    reason: format!("Entry [{i}][{j}] = {value} outside [-1, 1]"),
                });
            }
            if i == j && *value != Decimal::ONE {
                return Err(FinlitError::InvalidInput {
                    field: "correlations".into(),
                    reason: format!("Diagonal entry [{i}][{i}] must be 1, got {value}"),
                });
            }
            if correlations[j][i] != *value {
                return Err(FinlitError::InvalidInput {
                    field: "correlations".into(),
                    reason: format!("Matrix not symmetric at [{i}][{j}]"),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
