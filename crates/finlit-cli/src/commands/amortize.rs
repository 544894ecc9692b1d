use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finlit_core::amortization::{apply_lump_sum, build_amortization, LoanTerms, LumpSumInput};

use crate::input;

/// Arguments for amortization schedules
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to a JSON/YAML file with loan terms
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate in percent (4.5 means 4.5% APR)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Due date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,

    /// One-time extra payment amount (requires --extra-month)
    #[arg(long)]
    pub extra_amount: Option<Decimal>,

    /// 1-based month the extra payment lands on
    #[arg(long)]
    pub extra_month: Option<u32>,
}

fn load_terms(args: &AmortizeArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(LoanTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
        first_payment_date: args.first_payment_date,
    })
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = load_terms(&args)?;

    match (args.extra_amount, args.extra_month) {
        (None, None) => Ok(serde_json::to_value(build_amortization(&terms)?)?),
        (Some(extra_amount), Some(at_period)) => {
            let lump = LumpSumInput {
                terms,
                extra_amount,
                at_period,
            };
            Ok(serde_json::to_value(apply_lump_sum(&lump)?)?)
        }
        _ => Err("--extra-amount and --extra-month go together".into()),
    }
}
