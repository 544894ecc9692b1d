use rust_decimal::Decimal;
use thiserror::Error;

/// Everything an engine can refuse to do. Learner input never panics;
/// it lands here instead.
#[derive(Debug, Error)]
pub enum FinlitError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    /// The arithmetic is fine but the finance is not, e.g. credits
    /// exceeding the amount due on a purchase.
    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Convergence failure: {function} did not converge after {iterations} periods (remaining: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinlitError {
    fn from(e: serde_json::Error) -> Self {
        FinlitError::SerializationError(e.to_string())
    }
}
