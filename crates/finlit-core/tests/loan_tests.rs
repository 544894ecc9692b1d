#![cfg(all(feature = "loan_costs", feature = "ownership"))]

use finlit_core::amortization::{apply_lump_sum, build_amortization, LoanTerms, LumpSumInput};
use finlit_core::grading::grade;
use finlit_core::loan_costs::purchase::{FeeBundle, PurchaseInput};
use finlit_core::loan_costs::{compose_purchase, price_loan, LoanQuoteInput};
use finlit_core::ownership::{total_cost_of_ownership, OwnershipInput, OwnershipProfile};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Worksheet loan end-to-end — the $24,375 / 4% / 60-month exercise
// Published reference answers were produced with a rounded payment, so the
// checks below mirror how the grader accepts them: within 2% relative error.
// ===========================================================================

fn worksheet_terms() -> LoanTerms {
    LoanTerms {
        principal: dec!(24375),
        annual_rate_pct: dec!(4),
        term_months: 60,
        first_payment_date: None,
    }
}

#[test]
fn test_worksheet_payment_and_published_answer_agree_within_tolerance() {
    let schedule = build_amortization(&worksheet_terms()).unwrap().result;
    assert_eq!(schedule.payment, dec!(448.90));
    // The worksheet publishes $449.13; both directions grade as correct
    assert!(grade(schedule.payment, dec!(449.13), dec!(2)));
    assert!(grade(dec!(449.13), schedule.payment, dec!(2)));
}

#[test]
fn test_worksheet_totals_grade_against_published_answers() {
    let schedule = build_amortization(&worksheet_terms()).unwrap().result;
    assert!(grade(schedule.total_paid, dec!(26947.80), dec!(2)));
    assert!(grade(schedule.total_interest, dec!(2572.80), dec!(2)));
    // Exact internal identity still holds to the cent
    assert_eq!(schedule.total_paid - schedule.total_interest, dec!(24375));
}

#[test]
fn test_schedule_is_deterministic() {
    let first = build_amortization(&worksheet_terms()).unwrap().result;
    let second = build_amortization(&worksheet_terms()).unwrap().result;
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.total_paid, second.total_paid);
}

#[test]
fn test_principal_portions_sum_to_principal() {
    let schedule = build_amortization(&worksheet_terms()).unwrap().result;
    let principal_sum: Decimal = schedule.rows.iter().map(|r| r.principal).sum();
    assert_eq!(principal_sum, dec!(24375));
    assert_eq!(schedule.rows.last().unwrap().balance, Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Lump-sum early payoff
// ---------------------------------------------------------------------------

#[test]
fn test_lump_sum_accelerates_worksheet_loan() {
    let input = LumpSumInput {
        terms: worksheet_terms(),
        extra_amount: dec!(5000),
        at_period: 12,
    };
    let output = apply_lump_sum(&input).unwrap().result;
    assert!(
        output.months_saved >= 10 && output.months_saved <= 14,
        "Expected roughly a year saved, got {} months",
        output.months_saved
    );
    assert!(output.interest_saved > Decimal::ZERO);
    assert_eq!(
        output.interest_saved,
        output.baseline_total_interest - output.schedule.total_interest
    );
}

#[test]
fn test_lump_sum_keeps_prior_rows_identical() {
    let baseline = build_amortization(&worksheet_terms()).unwrap().result;
    let revised = apply_lump_sum(&LumpSumInput {
        terms: worksheet_terms(),
        extra_amount: dec!(5000),
        at_period: 12,
    })
    .unwrap()
    .result;
    assert_eq!(baseline.rows[..11], revised.schedule.rows[..11]);
}

#[test]
fn test_lump_sum_covering_balance_ends_schedule_at_event() {
    let output = apply_lump_sum(&LumpSumInput {
        terms: worksheet_terms(),
        extra_amount: dec!(25000),
        at_period: 3,
    })
    .unwrap()
    .result;
    assert_eq!(output.payoff_period, 3);
    assert_eq!(output.schedule.rows.len(), 3);
    assert_eq!(output.schedule.rows.last().unwrap().balance, Decimal::ZERO);
}

// ===========================================================================
// Purchase composition and quote tests ($26,500 showroom exercise)
// ===========================================================================

fn showroom() -> PurchaseInput {
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
fn test_showroom_financed_principal() {
    let composition = compose_purchase(&showroom()).unwrap().result;
    assert_eq!(composition.sales_tax, dec!(1722.50));
    assert_eq!(composition.total_due, dec!(29161.50));
    assert_eq!(composition.financed_principal, dec!(26161.50));
}

#[test]
fn test_trade_in_lowers_both_tax_and_principal() {
    let without_trade = compose_purchase(&showroom()).unwrap().result;

    let mut with_trade = showroom();
    with_trade.trade_in_value = dec!(4000);
    let composed = compose_purchase(&with_trade).unwrap().result;

    assert!(composed.sales_tax < without_trade.sales_tax);
    assert!(composed.financed_principal < without_trade.financed_principal);
    // Trade-in saves its face value plus the tax on it
    assert_eq!(
        without_trade.financed_principal - composed.financed_principal,
        dec!(4000) + dec!(260)
    );
}

#[test]
fn test_showroom_quote_full_pipeline() {
    let quote = price_loan(&LoanQuoteInput {
        purchase: showroom(),
        annual_rate_pct: dec!(4),
        term_months: 60,
        first_payment_date: None,
    })
    .unwrap()
    .result;

    assert_eq!(quote.terms.principal, dec!(26161.50));
    assert_eq!(quote.monthly_payment, quote.schedule.payment);
    assert_eq!(quote.total_cost, quote.schedule.total_paid);
    assert_eq!(quote.total_interest, quote.total_cost - dec!(26161.50));
    assert!(grade(quote.monthly_payment, dec!(481.80), dec!(2)));
}

// ===========================================================================
// Total cost of ownership tests (five-year horizon over the showroom purchase)
// ===========================================================================

#[test]
fn test_ownership_breakdown_reconciles() {
    let output = total_cost_of_ownership(&OwnershipInput {
        purchase: showroom(),
        annual_rate_pct: dec!(4),
        term_months: 60,
        profile: OwnershipProfile {
            insurance_monthly: dec!(140),
            maintenance_yearly: dec!(600),
            fuel_monthly: dec!(160),
            years_owned: 5,
            depreciation_rate_pct: dec!(15),
        },
    })
    .unwrap()
    .result;

    assert_eq!(output.amount_financed, dec!(26161.50));
    assert_eq!(output.insurance_total, dec!(8400));
    assert_eq!(output.maintenance_total, dec!(3000));
    assert_eq!(output.fuel_total, dec!(9600));
    assert_eq!(output.depreciation_total, dec!(26500) - dec!(11758.19));
    assert!(
        output.financing_cost > dec!(2700) && output.financing_cost < dec!(2800),
        "Financing cost out of range: {}",
        output.financing_cost
    );
    assert_eq!(
        output.total_cost_of_ownership,
        output.amount_financed
            + output.financing_cost
            + output.insurance_total
            + output.maintenance_total
            + output.fuel_total
            + output.depreciation_total
    );
}

#[test]
fn test_depreciation_dominates_interest_on_this_vehicle() {
    // The exercise's teaching point: value lost to depreciation exceeds
    // everything paid in interest.
    let output = total_cost_of_ownership(&OwnershipInput {
        purchase: showroom(),
        annual_rate_pct: dec!(4),
        term_months: 60,
        profile: OwnershipProfile {
            insurance_monthly: dec!(140),
            maintenance_yearly: dec!(600),
            fuel_monthly: dec!(160),
            years_owned: 5,
            depreciation_rate_pct: dec!(15),
        },
    })
    .unwrap()
    .result;
    assert!(output.depreciation_total > output.financing_cost);
}
