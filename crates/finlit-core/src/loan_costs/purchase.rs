use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::round_cents;
use crate::error::FinlitError;
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::FinlitResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Dealer and state charges added on top of the sale price.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeBundle {
    #[serde(default)]
    pub doc_fee: Money,
    #[serde(default)]
    pub destination_fee: Money,
    #[serde(default)]
    pub title_fee: Money,
    #[serde(default)]
    pub registration_fee: Money,
    /// Sales tax rate in percent (6.5 means 6.5%).
    #[serde(default)]
    pub sales_tax_rate_pct: Percent,
}

impl FeeBundle {
    /// All flat fees, excluding sales tax.
    pub fn total_fees(&self) -> Money {
        self.doc_fee + self.destination_fee + self.title_fee + self.registration_fee
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub price: Money,
    #[serde(default)]
    pub trade_in_value: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub rebates: Money,
    #[serde(default)]
    pub fees: FeeBundle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseComposition {
    pub price: Money,
    pub total_fees: Money,
    /// Sale price less trade-in credit, floored at zero.
    pub taxable_amount: Money,
    pub sales_tax: Money,
    /// Trade-in + down payment + rebates.
    pub total_credits: Money,
    /// Everything due before credits: price + fees + tax.
    pub total_due: Money,
    pub financed_principal: Money,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Sale price less trade-in credit, floored at zero. Most states tax the
/// difference, not the sticker price; that rule is fixed here.
pub fn taxable_amount(price: Money, trade_in_value: Money) -> Money {
    (price - trade_in_value).max(Decimal::ZERO)
}

/// Amount left to finance after fees, tax, and every credit.
///
/// Rejects over-credited purchases (credits exceeding the amount due)
/// rather than returning a negative principal.
pub fn financed_principal(input: &PurchaseInput) -> FinlitResult<Money> {
    validate_purchase(input)?;

    let taxable = taxable_amount(input.price, input.trade_in_value);
    let sales_tax = round_cents(taxable * percent_to_rate(input.fees.sales_tax_rate_pct));
    let total_due = input.price + input.fees.total_fees() + sales_tax;
    let total_credits = input.trade_in_value + input.down_payment + input.rebates;

    let financed = total_due - total_credits;
    if financed < Decimal::ZERO {
        return Err(FinlitError::FinancialImpossibility(format!(
            "Credits of {total_credits} exceed the {total_due} due; nothing left to finance"
        )));
    }
    Ok(financed)
}

/// Full fee/tax/credit breakdown for a purchase.
pub fn compose_purchase(
    input: &PurchaseInput,
) -> FinlitResult<ComputationOutput<PurchaseComposition>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let financed = financed_principal(input)?;

    let taxable = taxable_amount(input.price, input.trade_in_value);
    if input.trade_in_value > input.price {
        warnings.push(
            "Trade-in exceeds the sale price; taxable amount floors at zero".to_string(),
        );
    }
    let sales_tax = round_cents(taxable * percent_to_rate(input.fees.sales_tax_rate_pct));
    let total_fees = input.fees.total_fees();
    let total_credits = input.trade_in_value + input.down_payment + input.rebates;
    let total_due = input.price + total_fees + sales_tax;

    if financed.is_zero() {
        warnings.push("Credits cover the full purchase; no loan is needed".to_string());
    }

    let composition = PurchaseComposition {
        price: input.price,
        total_fees,
        taxable_amount: taxable,
        sales_tax,
        total_credits,
        total_due,
        financed_principal: financed,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Purchase composition: price + fees + tax on (price - trade-in), less trade-in, down payment, and rebates",
        input,
        warnings,
        elapsed,
        composition,
    ))
}

fn validate_purchase(input: &PurchaseInput) -> FinlitResult<()> {
    let non_negative = [
        ("price", input.price),
        ("trade_in_value", input.trade_in_value),
        ("down_payment", input.down_payment),
        ("rebates", input.rebates),
        ("fees.doc_fee", input.fees.doc_fee),
        ("fees.destination_fee", input.fees.destination_fee),
        ("fees.title_fee", input.fees.title_fee),
        ("fees.registration_fee", input.fees.registration_fee),
        ("fees.sales_tax_rate_pct", input.fees.sales_tax_rate_pct),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(FinlitError::InvalidInput {
                field: field.to_string(),
                reason: "Value cannot be negative".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn showroom_purchase() -> PurchaseInput {
        PurchaseInput {
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
        }
    }

    #[test]
    fn test_financed_principal_known_value() {
        // 26500 + 499 + 75 + 365 + 26500 * 6.5% - 3000
        let financed = financed_principal(&showroom_purchase()).unwrap();
        assert_eq!(financed, dec!(26161.50));
    }

    #[test]
    fn test_sales_tax_on_full_price_without_trade_in() {
        let output = compose_purchase(&showroom_purchase()).unwrap();
        assert_eq!(output.result.taxable_amount, dec!(26500));
        assert_eq!(output.result.sales_tax, dec!(1722.50));
        assert_eq!(output.result.total_fees, dec!(939));
    }

    #[test]
    fn test_trade_in_reduces_taxable_amount() {
        let mut input = showroom_purchase();
        input.trade_in_value = dec!(6500);
        let output = compose_purchase(&input).unwrap();
        assert_eq!(output.result.taxable_amount, dec!(20000));
        assert_eq!(output.result.sales_tax, dec!(1300));
    }

    #[test]
    fn test_taxable_amount_floors_at_zero() {
        assert_eq!(taxable_amount(dec!(10000), dec!(12000)), Decimal::ZERO);
        assert_eq!(taxable_amount(dec!(10000), dec!(4000)), dec!(6000));
    }

    #[test]
    fn test_monotonic_in_price_and_fees() {
        let base = financed_principal(&showroom_purchase()).unwrap();

        let mut pricier = showroom_purchase();
        pricier.price += dec!(1000);
        assert!(financed_principal(&pricier).unwrap() > base);

        let mut more_fees = showroom_purchase();
        more_fees.fees.doc_fee += dec!(100);
        assert!(financed_principal(&more_fees).unwrap() > base);
    }

    #[test]
    fn test_monotonic_decreasing_in_credits() {
        let base = financed_principal(&showroom_purchase()).unwrap();

        let mut bigger_down = showroom_purchase();
        bigger_down.down_payment += dec!(500);
        assert!(financed_principal(&bigger_down).unwrap() < base);

        let mut with_rebate = showroom_purchase();
        with_rebate.rebates = dec!(750);
        assert!(financed_principal(&with_rebate).unwrap() < base);

        let mut with_trade = showroom_purchase();
        with_trade.trade_in_value = dec!(2000);
        assert!(financed_principal(&with_trade).unwrap() < base);
    }

    #[test]
    fn test_over_credited_rejected() {
        let mut input = showroom_purchase();
        input.down_payment = dec!(50000);
        assert!(matches!(
            financed_principal(&input),
            Err(FinlitError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut input = showroom_purchase();
        input.fees.title_fee = dec!(-1);
        assert!(matches!(
            financed_principal(&input),
            Err(FinlitError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_exact_credit_warns_no_loan() {
        let input = PurchaseInput {
            price: dec!(10000),
            trade_in_value: Decimal::ZERO,
            down_payment: dec!(10000),
            rebates: Decimal::ZERO,
            fees: FeeBundle::default(),
        };
        let output = compose_purchase(&input).unwrap();
        assert_eq!(output.result.financed_principal, Decimal::ZERO);
        assert!(output.warnings.iter().any(|w| w.contains("no loan")));
    }
}
