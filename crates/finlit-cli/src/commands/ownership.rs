use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finlit_core::loan_costs::{FeeBundle, PurchaseInput};
use finlit_core::ownership::{total_cost_of_ownership, OwnershipInput, OwnershipProfile};

use crate::input;

/// Arguments for the total-cost-of-ownership breakdown
#[derive(Args)]
pub struct OwnershipArgs {
    /// Path to a JSON/YAML file with the full ownership request
    #[arg(long)]
    pub input: Option<String>,

    /// Sticker price of the vehicle
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Trade-in value credited against the purchase
    #[arg(long, default_value = "0")]
    pub trade_in: Decimal,

    /// Cash down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Manufacturer rebates
    #[arg(long, default_value = "0")]
    pub rebates: Decimal,

    /// Documentation fee
    #[arg(long, default_value = "0")]
    pub doc_fee: Decimal,

    /// Title fee
    #[arg(long, default_value = "0")]
    pub title_fee: Decimal,

    /// Registration fee
    #[arg(long, default_value = "0")]
    pub registration_fee: Decimal,

    /// Sales tax rate in percent
    #[arg(long, default_value = "0")]
    pub tax_rate: Decimal,

    /// Annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Monthly insurance premium
    #[arg(long, default_value = "0")]
    pub insurance_monthly: Decimal,

    /// Yearly maintenance budget
    #[arg(long, default_value = "0")]
    pub maintenance_yearly: Decimal,

    /// Monthly fuel spend
    #[arg(long, default_value = "0")]
    pub fuel_monthly: Decimal,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Compound annual depreciation rate in percent
    #[arg(long)]
    pub depreciation_rate: Option<Decimal>,
}

pub fn run_ownership(args: OwnershipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: OwnershipInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        OwnershipInput {
            purchase: PurchaseInput {
                price: args.price.ok_or("--price is required (or provide --input)")?,
                trade_in_value: args.trade_in,
                down_payment: args.down_payment,
                rebates: args.rebates,
                fees: FeeBundle {
                    doc_fee: args.doc_fee,
                    title_fee: args.title_fee,
                    registration_fee: args.registration_fee,
                    sales_tax_rate_pct: args.tax_rate,
                    ..FeeBundle::default()
                },
            },
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            profile: OwnershipProfile {
                insurance_monthly: args.insurance_monthly,
                maintenance_yearly: args.maintenance_yearly,
                fuel_monthly: args.fuel_monthly,
                years_owned: args.years.ok_or("--years is required (or provide --input)")?,
                depreciation_rate_pct: args
                    .depreciation_rate
                    .ok_or("--depreciation-rate is required (or provide --input)")?,
            },
        }
    };

    Ok(serde_json::to_value(total_cost_of_ownership(&request)?)?)
}
