use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use finlit_core::fixtures;
use finlit_core::portfolio::downside::downside_risk;
use finlit_core::portfolio::statistics::{portfolio_statistics, PortfolioInput};
use finlit_core::portfolio::stress::{stress_impact, StressInput, StressScenario};

use crate::input;

/// Arguments for portfolio statistics
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to a JSON/YAML file with assets, correlations, and an optional
    /// risk-free rate; defaults to the built-in six-asset universe
    #[arg(long)]
    pub input: Option<String>,

    /// Override the universe's risk-free rate, in percent
    #[arg(long)]
    pub risk_free: Option<Decimal>,

    /// Add the impact of a built-in crisis scenario (by name, case-insensitive)
    #[arg(long)]
    pub stress: Option<String>,

    /// Include VaR/CVaR downside approximations
    #[arg(long)]
    pub downside: bool,

    /// List the built-in crisis scenarios and exit
    #[arg(long)]
    pub list_scenarios: bool,
}

#[derive(Serialize)]
struct ScenarioSummary {
    name: String,
    description: String,
    assets_covered: usize,
}

fn load_universe(args: &PortfolioArgs) -> Result<PortfolioInput, Box<dyn std::error::Error>> {
    let mut universe: PortfolioInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        fixtures::investment_universe()
    };
    if let Some(rf) = args.risk_free {
        universe.risk_free_rate_pct = Some(rf);
    }
    Ok(universe)
}

fn find_scenario(name: &str) -> Result<StressScenario, Box<dyn std::error::Error>> {
    let scenarios = fixtures::crisis_scenarios();
    let available: Vec<String> = scenarios.iter().map(|s| s.name.clone()).collect();
    scenarios
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            format!(
                "Unknown scenario '{}'. Built-in scenarios: {}",
                name,
                available.join(", ")
            )
            .into()
        })
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.list_scenarios {
        let summaries: Vec<ScenarioSummary> = fixtures::crisis_scenarios()
            .into_iter()
            .map(|s| ScenarioSummary {
                name: s.name,
                description: s.description,
                assets_covered: s.shocks.len(),
            })
            .collect();
        return Ok(serde_json::to_value(summaries)?);
    }

    let universe = load_universe(&args)?;
    let statistics = portfolio_statistics(&universe)?;

    if args.stress.is_none() && !args.downside {
        return Ok(serde_json::to_value(statistics)?);
    }

    let mut combined = serde_json::Map::new();
    combined.insert("statistics".to_string(), serde_json::to_value(statistics)?);

    if let Some(ref name) = args.stress {
        let scenario = find_scenario(name)?;
        let impact = stress_impact(&StressInput {
            assets: universe.assets.clone(),
            scenario,
        })?;
        combined.insert("stress_impact".to_string(), serde_json::to_value(impact)?);
    }

    if args.downside {
        let downside = downside_risk(&universe)?;
        combined.insert("downside".to_string(), serde_json::to_value(downside)?);
    }

    Ok(Value::Object(combined))
}
