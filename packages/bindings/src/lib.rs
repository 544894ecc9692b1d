use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn build_amortization(input_json: String) -> NapiResult<String> {
    let input: finlit_core::amortization::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::amortization::build_amortization(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn apply_lump_sum(input_json: String) -> NapiResult<String> {
    let input: finlit_core::amortization::LumpSumInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::amortization::apply_lump_sum(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loan costs
// ---------------------------------------------------------------------------

#[napi]
pub fn price_loan(input_json: String) -> NapiResult<String> {
    let input: finlit_core::loan_costs::LoanQuoteInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::loan_costs::price_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[napi]
pub fn total_cost_of_ownership(input_json: String) -> NapiResult<String> {
    let input: finlit_core::ownership::OwnershipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::ownership::total_cost_of_ownership(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn portfolio_statistics(input_json: String) -> NapiResult<String> {
    let input: finlit_core::portfolio::PortfolioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::portfolio::portfolio_statistics(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn stress_impact(input_json: String) -> NapiResult<String> {
    let input: finlit_core::portfolio::StressInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::portfolio::stress_impact(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn downside_risk(input_json: String) -> NapiResult<String> {
    let input: finlit_core::portfolio::PortfolioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::portfolio::downside_risk(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn attribute_performance(input_json: String) -> NapiResult<String> {
    let input: finlit_core::portfolio::AttributionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::portfolio::attribute_performance(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct SharpeBindingInput {
    expected_return_pct: rust_decimal::Decimal,
    std_dev_pct: rust_decimal::Decimal,
    risk_free_rate_pct: rust_decimal::Decimal,
}

#[napi]
pub fn sharpe_ratio(input_json: String) -> NapiResult<String> {
    let binding_input: SharpeBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::portfolio::sharpe_ratio(
        binding_input.expected_return_pct,
        binding_input.std_dev_pct,
        binding_input.risk_free_rate_pct,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

#[napi]
pub fn grade_answers(input_json: String) -> NapiResult<String> {
    let input: finlit_core::grading::GradeInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::grading::grade_answers(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Coach
// ---------------------------------------------------------------------------

#[napi]
pub fn coach_reply(input_json: String) -> NapiResult<String> {
    let input: finlit_core::coach::CoachInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finlit_core::coach::coach_reply(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
