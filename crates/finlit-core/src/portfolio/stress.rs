use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use super::statistics::{normalize_allocations, AssetEntry};
use crate::error::FinlitError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fixed return for one asset under a named scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetShock {
    pub asset_id: String,
    /// Scenario return in percent (-38 means a 38% loss).
    pub return_pct: Percent,
}

/// A named market episode expressed as per-asset returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    pub description: String,
    pub shocks: Vec<AssetShock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressInput {
    pub assets: Vec<AssetEntry>,
    pub scenario: StressScenario,
}

/// Impact on a single holding: weight times scenario return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetImpact {
    pub id: String,
    pub weight: Decimal,
    pub shock_pct: Percent,
    pub contribution_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressImpactOutput {
    pub scenario_name: String,
    /// Weighted sum of scenario returns, in percent.
    pub portfolio_impact_pct: Percent,
    pub asset_impacts: Vec<AssetImpact>,
    /// Holdings the scenario says nothing about; they contribute zero.
    pub uncovered_assets: Vec<String>,
}

// ---------------------------------------------------------------------------
// Stress impact
// ---------------------------------------------------------------------------

/// Replay a named scenario against the current allocation.
///
/// Each holding contributes weight x scenario return; holdings the
/// scenario does not mention sit out with zero contribution.
pub fn stress_impact(input: &StressInput) -> FinlitResult<ComputationOutput<StressImpactOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.assets.is_empty() {
        return Err(FinlitError::InsufficientData(
            "Stress test needs at least one holding".into(),
        ));
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(input.assets.len());
    for asset in &input.assets {
        if !seen.insert(asset.id.as_str()) {
            return Err(FinlitError::InvalidInput {
                field: "assets".into(),
                reason: format!("Duplicate asset id '{}'", asset.id),
            });
        }
        if asset.allocation_pct < Decimal::ZERO {
            return Err(FinlitError::InvalidInput {
                field: format!("assets[{}].allocation_pct", asset.id),
                reason: "Allocation cannot be negative".into(),
            });
        }
    }

    let weights = normalize_allocations(&input.assets)?;

    let mut asset_impacts = Vec::with_capacity(input.assets.len());
    let mut uncovered_assets = Vec::new();
    let mut portfolio_impact_pct = Decimal::ZERO;

    for (asset, weight) in input.assets.iter().zip(weights.iter()) {
        let shock = input
            .scenario
            .shocks
            .iter()
            .find(|s| s.asset_id == asset.id)
            .map(|s| s.return_pct);
        let shock_pct = match shock {
            Some(value) => value,
            None => {
                uncovered_assets.push(asset.id.clone());
                Decimal::ZERO
            }
        };
        let contribution_pct = *weight * shock_pct;
        portfolio_impact_pct += contribution_pct;
        asset_impacts.push(AssetImpact {
            id: asset.id.clone(),
            weight: *weight,
            shock_pct,
            contribution_pct,
        });
    }

    if !uncovered_assets.is_empty() {
        warnings.push(format!(
            "Scenario '{}' does not cover: {}; those holdings contribute zero",
            input.scenario.name,
            uncovered_assets.join(", ")
        ));
    }
    for shock in &input.scenario.shocks {
        if !input.assets.iter().any(|a| a.id == shock.asset_id) {
            warnings.push(format!(
                "Scenario shock for unknown asset '{}' ignored",
                shock.asset_id
            ));
        }
    }

    let output = StressImpactOutput {
        scenario_name: input.scenario.name.clone(),
        portfolio_impact_pct,
        asset_impacts,
        uncovered_assets,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Scenario stress impact: weighted sum of fixed per-asset scenario returns",
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
    use rust_decimal_macros::dec;

    fn asset(id: &str, alloc: Decimal) -> AssetEntry {
        AssetEntry {
            id: id.to_string(),
            expected_return_pct: dec!(7),
            std_dev_pct: dec!(12),
            allocation_pct: alloc,
        }
    }

    fn crisis() -> StressScenario {
        StressScenario {
            name: "2008 Financial Crisis".to_string(),
            description: "Global equity collapse, flight to treasuries".to_string(),
            shocks: vec![
                AssetShock {
                    asset_id: "stocks".into(),
                    return_pct: dec!(-38),
                },
                AssetShock {
                    asset_id: "bonds".into(),
                    return_pct: dec!(5),
                },
            ],
        }
    }

    #[test]
    fn test_weighted_impact_known_value() {
        let input = StressInput {
            assets: vec![asset("stocks", dec!(60)), asset("bonds", dec!(40))],
            scenario: crisis(),
        };
        let output = stress_impact(&input).unwrap();
        // 0.6 * -38 + 0.4 * 5 = -20.8
        assert_eq!(output.result.portfolio_impact_pct, dec!(-20.8));
        assert!(output.result.uncovered_assets.is_empty());
    }

    #[test]
    fn test_uncovered_asset_contributes_zero() {
        let input = StressInput {
            assets: vec![
                asset("stocks", dec!(50)),
                asset("bonds", dec!(25)),
                asset("gold", dec!(25)),
            ],
            scenario: crisis(),
        };
        let output = stress_impact(&input).unwrap();
        // 0.5 * -38 + 0.25 * 5 + 0.25 * 0 = -17.75
        assert_eq!(output.result.portfolio_impact_pct, dec!(-17.75));
        assert_eq!(output.result.uncovered_assets, vec!["gold".to_string()]);
        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("does not cover: gold")));
    }

    #[test]
    fn test_unknown_shock_warns() {
        let mut scenario = crisis();
        scenario.shocks.push(AssetShock {
            asset_id: "crypto".into(),
            return_pct: dec!(-60),
        });
        let input = StressInput {
            assets: vec![asset("stocks", dec!(60)), asset("bonds", dec!(40))],
            scenario,
        };
        let output = stress_impact(&input).unwrap();
        assert_eq!(output.result.portfolio_impact_pct, dec!(-20.8));
        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("unknown asset 'crypto'")));
    }

    #[test]
    fn test_empty_assets_rejected() {
        let input = StressInput {
            assets: vec![],
            scenario: crisis(),
        };
        assert!(stress_impact(&input).is_err());
    }

    #[test]
    fn test_zero_allocation_total_rejected() {
        let input = StressInput {
            assets: vec![asset("stocks", Decimal::ZERO)],
            scenario: crisis(),
        };
        assert!(matches!(
            stress_impact(&input),
            Err(FinlitError::DivisionByZero { .. })
        ));
    }
}
