use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finlit_core::loan_costs::{price_loan, FeeBundle, LoanQuoteInput, PurchaseInput};

use crate::input;

/// Arguments for a full loan quote
#[derive(Args)]
pub struct PriceLoanArgs {
    /// Path to a JSON/YAML file with a loan quote request
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

    /// Destination / delivery fee
    #[arg(long, default_value = "0")]
    pub destination_fee: Decimal,

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

    /// Due date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

pub fn run_price_loan(args: PriceLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let quote: LoanQuoteInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanQuoteInput {
            purchase: PurchaseInput {
                price: args.price.ok_or("--price is required (or provide --input)")?,
                trade_in_value: args.trade_in,
                down_payment: args.down_payment,
                rebates: args.rebates,
                fees: FeeBundle {
                    doc_fee: args.doc_fee,
                    destination_fee: args.destination_fee,
                    title_fee: args.title_fee,
                    registration_fee: args.registration_fee,
                    sales_tax_rate_pct: args.tax_rate,
                },
            },
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            first_payment_date: args.first_payment_date,
        }
    };

    Ok(serde_json::to_value(price_loan(&quote)?)?)
}
