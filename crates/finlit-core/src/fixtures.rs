//! Built-in exercise datasets.
//!
//! Every exercise starts from fixed fixture data rather than live quotes:
//! a showroom purchase, a rack of competing loan offers, an ownership
//! profile, a six-asset investment universe, and a set of historical
//! crisis scenarios. Values are chosen to produce round, gradeable
//! reference answers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::amortization::LoanTerms;
use crate::loan_costs::purchase::{FeeBundle, PurchaseInput};
use crate::ownership::cost_model::OwnershipProfile;
use crate::portfolio::statistics::{AssetEntry, PortfolioInput};
use crate::portfolio::stress::{AssetShock, StressScenario};

/// A dealership offer as it appears on the exercise card.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoanOffer {
    pub lender: String,
    pub annual_rate_pct: Decimal,
    pub term_months: u32,
}

/// The $26,500 compact-SUV purchase used across the loan exercises.
pub fn showroom_purchase() -> PurchaseInput {
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

/// The worksheet loan the amortization exercise is built around.
pub fn worksheet_loan() -> LoanTerms {
    LoanTerms {
        principal: dec!(24375),
        annual_rate_pct: dec!(4),
        term_months: 60,
        first_payment_date: None,
    }
}

/// Competing offers for the rate-comparison exercise.
pub fn loan_offers() -> Vec<LoanOffer> {
    vec![
        LoanOffer {
            lender: "Dealer financing".into(),
            annual_rate_pct: dec!(6.9),
            term_months: 72,
        },
        LoanOffer {
            lender: "Credit union".into(),
            annual_rate_pct: dec!(4.0),
            term_months: 60,
        },
        LoanOffer {
            lender: "Online bank".into(),
            annual_rate_pct: dec!(5.2),
            term_months: 48,
        },
    ]
}

/// Running-cost assumptions for the total-cost-of-ownership exercise.
pub fn ownership_profile() -> OwnershipProfile {
    OwnershipProfile {
        insurance_monthly: dec!(140),
        maintenance_yearly: dec!(600),
        fuel_monthly: dec!(160),
        years_owned: 5,
        depreciation_rate_pct: dec!(15),
    }
}

/// Six-asset universe for the diversification exercises, with a default
/// equal-weight allocation the learner then adjusts.
pub fn investment_universe() -> PortfolioInput {
    let asset = |id: &str, ret: Decimal, sd: Decimal| AssetEntry {
        id: id.to_string(),
        expected_return_pct: ret,
        std_dev_pct: sd,
        allocation_pct: dec!(16.67),
    };
    PortfolioInput {
        assets: vec![
            asset("us_stocks", dec!(10.0), dec!(15.0)),
            asset("intl_stocks", dec!(8.5), dec!(17.0)),
            asset("bonds", dec!(4.0), dec!(5.0)),
            asset("reits", dec!(7.5), dec!(19.0)),
            asset("commodities", dec!(5.0), dec!(16.0)),
            asset("cash", dec!(3.0), dec!(1.0)),
        ],
        correlations: universe_correlations(),
        risk_free_rate_pct: Some(dec!(3)),
    }
}

/// Correlations for [`investment_universe`], symmetric with unit diagonal.
pub fn universe_correlations() -> Vec<Vec<Decimal>> {
    vec![
        vec![dec!(1), dec!(0.85), dec!(0.10), dec!(0.70), dec!(0.30), dec!(0.00)],
        vec![dec!(0.85), dec!(1), dec!(0.15), dec!(0.65), dec!(0.35), dec!(0.00)],
        vec![dec!(0.10), dec!(0.15), dec!(1), dec!(0.20), dec!(-0.05), dec!(0.10)],
        vec![dec!(0.70), dec!(0.65), dec!(0.20), dec!(1), dec!(0.25), dec!(0.00)],
        vec![dec!(0.30), dec!(0.35), dec!(-0.05), dec!(0.25), dec!(1), dec!(0.00)],
        vec![dec!(0.00), dec!(0.00), dec!(0.10), dec!(0.00), dec!(0.00), dec!(1)],
    ]
}

/// Historical crisis return tables for the stress exercise, keyed to the
/// asset ids of [`investment_universe`].
pub fn crisis_scenarios() -> Vec<StressScenario> {
    let shock = |asset_id: &str, return_pct: Decimal| AssetShock {
        asset_id: asset_id.to_string(),
        return_pct,
    };
    vec![
        StressScenario {
            name: "2008 Financial Crisis".into(),
            description: "Global equity collapse; treasuries rally, real estate craters".into(),
            shocks: vec![
                shock("us_stocks", dec!(-38)),
                shock("intl_stocks", dec!(-43)),
                shock("bonds", dec!(5)),
                shock("reits", dec!(-40)),
                shock("commodities", dec!(-35)),
                shock("cash", dec!(1)),
            ],
        },
        StressScenario {
            name: "COVID Crash 2020".into(),
            description: "Fastest bear market on record, sharp but short".into(),
            shocks: vec![
                shock("us_stocks", dec!(-34)),
                shock("intl_stocks", dec!(-33)),
                shock("bonds", dec!(3)),
                shock("reits", dec!(-38)),
                shock("commodities", dec!(-29)),
                shock("cash", dec!(0)),
            ],
        },
        StressScenario {
            name: "1970s Stagflation".into(),
            description: "Inflation shock; commodities rally while stocks and bonds sag".into(),
            shocks: vec![
                shock("us_stocks", dec!(-15)),
                shock("intl_stocks", dec!(-12)),
                shock("bonds", dec!(-8)),
                shock("reits", dec!(-5)),
                shock("commodities", dec!(25)),
                shock("cash", dec!(2)),
            ],
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
