//! Portfolio statistics for the investing exercises: mean-variance
//! aggregates, scenario stress impacts, downside-risk approximations, and
//! factor attribution.

pub mod attribution;
pub mod downside;
pub mod statistics;
pub mod stress;

pub use attribution::{attribute_performance, AttributionInput, AttributionOutput, FactorExposure};
pub use downside::{downside_risk, loss_multiplier, DownsideOutput};
pub use statistics::{
    normalize_allocations, portfolio_statistics, sharpe_ratio, AssetEntry, PortfolioInput,
    PortfolioStatisticsOutput, RiskContribution,
};
pub use stress::{stress_impact, StressImpactOutput, StressInput, StressScenario};
