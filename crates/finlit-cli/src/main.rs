mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortize::AmortizeArgs;
use commands::coach::CoachArgs;
use commands::grade::GradeArgs;
use commands::loan::PriceLoanArgs;
use commands::ownership::OwnershipArgs;
use commands::portfolio::PortfolioArgs;

/// Financial-literacy calculation engines
#[derive(Parser)]
#[command(
    name = "finlit",
    version,
    about = "Decimal-precision calculators behind the financial-literacy exercises",
    long_about = "Runs the finlit calculation engines from the command line: amortization \
                  schedules, vehicle loan pricing, total cost of ownership, portfolio \
                  statistics with crisis stress scenarios, tolerance-based answer grading, \
                  and the scripted study coach. Inputs come from flags, JSON/YAML files, \
                  or piped JSON on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an amortization schedule, optionally with a one-time extra payment
    Amortize(AmortizeArgs),
    /// Price a vehicle loan: fees, taxes, financed principal, payment, totals
    PriceLoan(PriceLoanArgs),
    /// Total cost of ownership over a holding period
    Ownership(OwnershipArgs),
    /// Portfolio statistics, with optional crisis stress and downside measures
    Portfolio(PortfolioArgs),
    /// Grade submitted answers against reference values
    Grade(GradeArgs),
    /// Ask the scripted study coach a question
    Coach(CoachArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortize::run_amortize(args),
        Commands::PriceLoan(args) => commands::loan::run_price_loan(args),
        Commands::Ownership(args) => commands::ownership::run_ownership(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Grade(args) => commands::grade::run_grade(args),
        Commands::Coach(args) => commands::coach::run_coach(args),
        Commands::Version => {
            println!("finlit {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
