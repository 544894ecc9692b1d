use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Monetary amounts. Money stays in Decimal end to end.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Internal use only.
pub type Rate = Decimal;

/// Learner-facing percentages (5 = 5%). Fixtures and exercise inputs use
/// these; engines convert at the boundary.
pub type Percent = Decimal;

/// Convert a learner-facing percentage into a decimal rate.
pub fn percent_to_rate(pct: Percent) -> Rate {
    pct / dec!(100)
}

/// Envelope every engine entry point returns: the result plus the context
/// an exercise page needs to label it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    /// One line naming the method, shown under the numbers.
    pub methodology: String,
    /// Echo of the inputs the computation actually ran with.
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

impl ComputationMetadata {
    fn capture(elapsed_us: u64) -> Self {
        ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        }
    }
}

/// Wrap an engine result in the standard envelope.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata::capture(elapsed_us),
    }
}
