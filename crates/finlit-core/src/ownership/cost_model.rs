use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::depreciation::{
    depreciation_schedule, value_after, DepreciationRow, MAX_HORIZON_YEARS,
};
use crate::amortization::schedule::{build_rows, summarize};
use crate::amortization::{validate_terms, LoanTerms};
use crate::error::FinlitError;
use crate::loan_costs::purchase::{financed_principal, PurchaseInput};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipProfile {
    #[serde(default)]
    pub insurance_monthly: Money,
    #[serde(default)]
    pub maintenance_yearly: Money,
    #[serde(default)]
    pub fuel_monthly: Money,
    pub years_owned: u32,
    /// Compound annual value decay, in percent.
    pub depreciation_rate_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipInput {
    pub purchase: PurchaseInput,
    pub annual_rate_pct: Percent,
    pub term_months: u32,
    pub profile: OwnershipProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipBreakdown {
    pub amount_financed: Money,
    /// Interest over the full loan term.
    pub financing_cost: Money,
    pub insurance_total: Money,
    pub maintenance_total: Money,
    pub fuel_total: Money,
    /// Purchase price less estimated value at the end of the horizon.
    pub depreciation_total: Money,
    pub resale_value: Money,
    pub total_cost_of_ownership: Money,
    /// Total spread over the horizon, when the horizon is non-zero.
    pub cost_per_month: Option<Money>,
    pub depreciation_schedule: Vec<DepreciationRow>,
}

// ---------------------------------------------------------------------------
// Cost model
// ---------------------------------------------------------------------------

/// Aggregate what a vehicle actually costs over the holding period:
/// amount financed, loan interest, insurance, maintenance, fuel, and the
/// value lost to depreciation.
pub fn total_cost_of_ownership(
    input: &OwnershipInput,
) -> FinlitResult<ComputationOutput<OwnershipBreakdown>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    validate_profile(&input.profile)?;

    let amount_financed = financed_principal(&input.purchase)?;

    let financing_cost = if amount_financed.is_zero() {
        warnings.push("Credits cover the full purchase; financing cost is zero".to_string());
        Decimal::ZERO
    } else {
        let terms = LoanTerms {
            principal: amount_financed,
            annual_rate_pct: input.annual_rate_pct,
            term_months: input.term_months,
            first_payment_date: None,
        };
        validate_terms(&terms)?;
        let (payment, rows) = build_rows(&terms)?;
        summarize(payment, rows).total_interest
    };

    let years = input.profile.years_owned;
    if years == 0 {
        warnings.push(
            "Zero-year horizon: recurring costs and depreciation do not accrue".to_string(),
        );
    }
    if input.term_months > years * 12 {
        warnings.push(format!(
            "Loan term of {} months runs past the {}-year horizon; full-term interest is still counted",
            input.term_months, years
        ));
    }

    let months = Decimal::from(years) * dec!(12);
    let insurance_total = input.profile.insurance_monthly * months;
    let fuel_total = input.profile.fuel_monthly * months;
    let maintenance_total = input.profile.maintenance_yearly * Decimal::from(years);

    let resale_value = value_after(
        input.purchase.price,
        input.profile.depreciation_rate_pct,
        years,
    )?;
    let depreciation_total = input.purchase.price - resale_value;
    let schedule = depreciation_schedule(
        input.purchase.price,
        input.profile.depreciation_rate_pct,
        years,
    )?;

    let total_cost_of_ownership = amount_financed
        + financing_cost
        + insurance_total
        + maintenance_total
        + fuel_total
        + depreciation_total;

    let cost_per_month = if months.is_zero() {
        None
    } else {
        Some(total_cost_of_ownership / months)
    };

    let output = OwnershipBreakdown {
        amount_financed,
        financing_cost,
        insurance_total,
        maintenance_total,
        fuel_total,
        depreciation_total,
        resale_value,
        total_cost_of_ownership,
        cost_per_month,
        depreciation_schedule: schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Total cost of ownership: financed amount + full-term interest + recurring costs + compound depreciation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_profile(profile: &OwnershipProfile) -> FinlitResult<()> {
    let non_negative = [
        ("insurance_monthly", profile.insurance_monthly),
        ("maintenance_yearly", profile.maintenance_yearly),
        ("fuel_monthly", profile.fuel_monthly),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(FinlitError::InvalidInput {
                field: field.to_string(),
                reason: "Value cannot be negative".into(),
            });
        }
    }
    if profile.years_owned > MAX_HORIZON_YEARS {
        return Err(FinlitError::InvalidInput {
            field: "years_owned".into(),
            reason: format!("Horizon cannot exceed {MAX_HORIZON_YEARS} years"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
