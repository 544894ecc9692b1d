//! Total cost of vehicle ownership: financing, recurring running costs,
//! and compound depreciation over the holding period.

pub mod cost_model;
pub mod depreciation;

pub use cost_model::{total_cost_of_ownership, OwnershipBreakdown, OwnershipInput, OwnershipProfile};
pub use depreciation::{depreciation_schedule, value_after, DepreciationRow, MAX_HORIZON_YEARS};
