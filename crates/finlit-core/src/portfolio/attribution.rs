use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinlitError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorExposure {
    pub name: String,
    /// Portfolio loading on the factor (e.g. 0.8).
    pub exposure: Decimal,
    /// Factor return over the period, percent.
    pub return_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionInput {
    pub portfolio_return_pct: Percent,
    pub factors: Vec<FactorExposure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorContribution {
    pub name: String,
    pub exposure: Decimal,
    pub return_pct: Percent,
    /// exposure x factor return.
    pub contribution_pct: Percent,
    /// Share of the explained return, percent.
    pub pct_of_explained: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionOutput {
    pub portfolio_return_pct: Percent,
    pub contributions: Vec<FactorContribution>,
    pub explained_return_pct: Percent,
    /// Residual the factors do not explain.
    pub alpha_pct: Percent,
}

// ---------------------------------------------------------------------------
// Attribution
// ---------------------------------------------------------------------------

/// Decompose a realized return into factor contributions and a residual.
///
/// Each factor explains exposure x factor return; whatever is left over
/// is reported as alpha.
pub fn attribute_performance(
    input: &AttributionInput,
) -> FinlitResult<ComputationOutput<AttributionOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.factors.is_empty() {
        return Err(FinlitError::InvalidInput {
            field: "factors".into(),
            reason: "Attribution needs at least one factor".into(),
        });
    }

    let mut contributions = Vec::with_capacity(input.factors.len());
    let mut explained_return_pct = Decimal::ZERO;

    for factor in &input.factors {
        let contribution_pct = factor.exposure * factor.return_pct;
        explained_return_pct += contribution_pct;
        contributions.push(FactorContribution {
            name: factor.name.clone(),
            exposure: factor.exposure,
            return_pct: factor.return_pct,
            contribution_pct,
            pct_of_explained: Decimal::ZERO,
        });
    }
    for contribution in &mut contributions {
        contribution.pct_of_explained = if explained_return_pct.is_zero() {
            Decimal::ZERO
        } else {
            contribution.contribution_pct / explained_return_pct * dec!(100)
        };
    }

    let alpha_pct = input.portfolio_return_pct - explained_return_pct;
    if alpha_pct.abs() > dec!(2) {
        warnings.push(format!(
            "Large unexplained residual: alpha of {alpha_pct}% suggests missing factors"
        ));
    }

    let output = AttributionOutput {
        portfolio_return_pct: input.portfolio_return_pct,
        contributions,
        explained_return_pct,
        alpha_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Linear factor attribution: exposure x factor return per factor, residual reported as alpha",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(name: &str, exposure: Decimal, ret: Decimal) -> FactorExposure {
        FactorExposure {
            name: name.to_string(),
            exposure,
            return_pct: ret,
        }
    }

    #[test]
    fn test_known_decomposition() {
        let input = AttributionInput {
            portfolio_return_pct: dec!(5),
            factors: vec![
                factor("value", dec!(0.8), dec!(3)),
                factor("momentum", dec!(0.2), dec!(5)),
            ],
        };
        let output = attribute_performance(&input).unwrap();
        // 0.8 * 3 + 0.2 * 5 = 3.4 explained, 1.6 alpha
        assert_eq!(output.result.explained_return_pct, dec!(3.4));
        assert_eq!(output.result.alpha_pct, dec!(1.6));
        assert_eq!(output.result.contributions[0].contribution_pct, dec!(2.4));
    }

    #[test]
    fn test_shares_of_explained_sum_to_100() {
        let input = AttributionInput {
            portfolio_return_pct: dec!(5),
            factors: vec![
                factor("value", dec!(0.8), dec!(3)),
                factor("momentum", dec!(0.2), dec!(5)),
            ],
        };
        let output = attribute_performance(&input).unwrap();
        let total: Decimal = output
            .result
            .contributions
            .iter()
            .map(|c| c.pct_of_explained)
            .sum();
        assert!((total - dec!(100)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_fully_explained_has_zero_alpha() {
        let input = AttributionInput {
            portfolio_return_pct: dec!(3.4),
            factors: vec![
                factor("value", dec!(0.8), dec!(3)),
                factor("momentum", dec!(0.2), dec!(5)),
            ],
        };
        let output = attribute_performance(&input).unwrap();
        assert_eq!(output.result.alpha_pct, Decimal::ZERO);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_negative_factor_return() {
        let input = AttributionInput {
            portfolio_return_pct: dec!(-1),
            factors: vec![factor("market", dec!(1), dec!(-4))],
        };
        let output = attribute_performance(&input).unwrap();
        assert_eq!(output.result.explained_return_pct, dec!(-4));
        assert_eq!(output.result.alpha_pct, dec!(3));
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_empty_factors_rejected() {
        let input = AttributionInput {
            portfolio_return_pct: dec!(5),
            factors: vec![],
        };
        assert!(matches!(
            attribute_performance(&input),
            Err(FinlitError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zero_explained_return_shares() {
        let input = AttributionInput {
            portfolio_return_pct: dec!(2),
            factors: vec![factor("market", Decimal::ZERO, dec!(5))],
        };
        let output = attribute_performance(&input).unwrap();
        assert_eq!(output.result.explained_return_pct, Decimal::ZERO);
        assert_eq!(output.result.contributions[0].pct_of_explained, Decimal::ZERO);
        assert_eq!(output.result.alpha_pct, dec!(2));
    }
}
