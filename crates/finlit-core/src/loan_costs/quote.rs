use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::purchase::{compose_purchase, PurchaseComposition, PurchaseInput};
use crate::amortization::schedule::{build_rows, summarize};
use crate::amortization::{AmortizationSchedule, LoanTerms};
use crate::error::FinlitError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuoteInput {
    pub purchase: PurchaseInput,
    /// Offered APR, in percent.
    pub annual_rate_pct: Percent,
    pub term_months: u32,
    #[serde(default)]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuoteOutput {
    pub composition: PurchaseComposition,
    /// Loan terms derived from the composition.
    pub terms: LoanTerms,
    pub monthly_payment: Money,
    /// Sum of every scheduled payment.
    pub total_cost: Money,
    /// Total cost less the financed principal.
    pub total_interest: Money,
    pub schedule: AmortizationSchedule,
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// Price a purchase end to end: compose the financed principal, amortize
/// it, and report payment and lifetime cost.
pub fn price_loan(input: &LoanQuoteInput) -> FinlitResult<ComputationOutput<LoanQuoteOutput>> {
    let start = Instant::now();

    let composed = compose_purchase(&input.purchase)?;
    let mut warnings = composed.warnings.clone();
    let composition = composed.result;

    if composition.financed_principal.is_zero() {
        return Err(FinlitError::FinancialImpossibility(
            "Credits cover the full purchase; there is no principal to amortize".into(),
        ));
    }

    let terms = LoanTerms {
        principal: composition.financed_principal,
        annual_rate_pct: input.annual_rate_pct,
        term_months: input.term_months,
        first_payment_date: input.first_payment_date,
    };
    crate::amortization::validate_terms(&terms)?;

    let (payment, rows) = build_rows(&terms)?;
    let schedule = summarize(payment, rows);

    if schedule.total_interest > composition.financed_principal {
        warnings.push(format!(
            "Interest of {} exceeds the amount financed; consider a shorter term or lower rate",
            schedule.total_interest
        ));
    }

    let output = LoanQuoteOutput {
        composition,
        terms: terms.clone(),
        monthly_payment: schedule.payment,
        total_cost: schedule.total_paid,
        total_interest: schedule.total_interest,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Loan quote: financed principal composed from the purchase, then amortized at the offered rate",
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
    use crate::loan_costs::purchase::FeeBundle;
    use rust_decimal_macros::dec;

    fn showroom_quote() -> LoanQuoteInput {
        LoanQuoteInput {
            purchase: PurchaseInput {
                price: dec!(26500),
                trade_in_value: Decimal::ZERO,
                down_payment: dec!(3000),
                rebates: Decimal::ZERO,
                fees: FeeBundle {
                    doc_fee: dec!(499),
                    destination_fee: Decimal::ZERO,
                    title_fee: dec!(75),
                    registration_fee: dec!(365),
                    sales_tax_rate_pct: dec!(6.5),
                },
            },
            annual_rate_pct: dec!(4),
            term_months: 60,
            first_payment_date: None,
        }
    }

    #[test]
    fn test_quote_composes_and_amortizes() {
        let output = price_loan(&showroom_quote()).unwrap();
        assert_eq!(output.result.terms.principal, dec!(26161.50));
        assert_eq!(output.result.schedule.rows.len(), 60);
        assert_eq!(
            output.result.schedule.rows.last().unwrap().balance,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_quote_payment_known_value() {
        // 26161.50 at 4% over 60 months
        let output = price_loan(&showroom_quote()).unwrap();
        assert!(
            (output.result.monthly_payment - dec!(481.80)).abs() < dec!(0.05),
            "Unexpected payment {}",
            output.result.monthly_payment
        );
    }

    #[test]
    fn test_total_interest_is_cost_less_principal() {
        let output = price_loan(&showroom_quote()).unwrap();
        assert_eq!(
            output.result.total_interest,
            output.result.total_cost - dec!(26161.50)
        );
        assert!(output.result.total_interest > Decimal::ZERO);
    }

    #[test]
    fn test_quote_rejects_fully_credited_purchase() {
        // Down payment equal to the 29,161.50 due leaves zero principal
        let mut input = showroom_quote();
        input.purchase.down_payment = dec!(29161.50);
        assert!(matches!(
            price_loan(&input),
            Err(FinlitError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_quote_rejects_bad_terms() {
        let mut input = showroom_quote();
        input.term_months = 0;
        assert!(price_loan(&input).is_err());
    }

    #[test]
    fn test_dated_quote_rows() {
        let mut input = showroom_quote();
        input.first_payment_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let output = price_loan(&input).unwrap();
        assert_eq!(
            output.result.schedule.rows[0].date,
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
    }
}
