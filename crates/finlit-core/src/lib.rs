pub mod error;
pub mod grading;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "loan_costs")]
pub mod loan_costs;

#[cfg(feature = "ownership")]
pub mod ownership;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "coach")]
pub mod coach;

#[cfg(feature = "fixtures")]
pub mod fixtures;

pub use error::FinlitError;
pub use types::*;

/// Standard result type for all finlit operations
pub type FinlitResult<T> = Result<T, FinlitError>;
