//! Loan Calculator CLI
//!
//! Command-line interface for repayment schedules, totals and effective rates

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use loan_calculator::{
    LoanRequest, LoanService, LoanType, Operation, PaymentDetail, Repayments, Schedule,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "loan_calculator", version, about = "Loan repayment schedules and effective interest rates")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print the JSON response body instead of a table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Repayment schedule, or a single payment with --payment-number
    Repayments {
        #[command(flatten)]
        loan: LoanArgs,

        /// Show only this payment (1-indexed)
        #[arg(long, allow_negative_numbers = true)]
        payment_number: Option<i64>,

        /// Also write the rows to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Totals over the full schedule
    Total {
        #[command(flatten)]
        loan: LoanArgs,
    },
    /// Effective annual interest rate including fees and balloon
    EffectiveRate {
        #[command(flatten)]
        loan: LoanArgs,
    },
}

#[derive(Debug, Args)]
struct LoanArgs {
    /// Amount borrowed
    #[arg(long, default_value_t = 10_000.0)]
    principal: f64,

    /// Nominal annual rate in percent
    #[arg(long, default_value_t = 2.5, allow_negative_numbers = true)]
    rate: f64,

    /// Number of monthly payments
    #[arg(long, default_value_t = 12)]
    num_payments: u32,

    /// annuity, fixed_amortization or fixed_payment
    #[arg(long, default_value = "annuity")]
    loan_type: LoanType,

    /// Fee charged with the first payment (negative for a rebate)
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    initial_fee: f64,

    /// Fee charged with every payment
    #[arg(long, default_value_t = 3.0, allow_negative_numbers = true)]
    payment_fee: f64,

    /// Lump sum due with the final payment
    #[arg(long, default_value_t = 0.0)]
    balloon_amount: f64,
}

impl LoanArgs {
    fn into_request(self, payment_number: Option<i64>) -> LoanRequest {
        LoanRequest {
            principal: self.principal,
            rate: self.rate,
            num_payments: self.num_payments,
            loan_type: self.loan_type,
            initial_fee: self.initial_fee,
            payment_fee: self.payment_fee,
            balloon_amount: self.balloon_amount,
            payment_number,
        }
    }
}

fn print_header(request: &LoanRequest) {
    println!("Loan: {} {:.2} at {}% over {} payments", request.loan_type, request.principal, request.rate, request.num_payments);
    println!("  Initial fee: {:.2}  Payment fee: {:.2}  Balloon: {:.2}", request.initial_fee, request.payment_fee, request.balloon_amount);
    println!();
}

fn print_rows(rows: &[PaymentDetail]) {
    println!("{:>7} {:>14} {:>12} {:>10} {:>14}", "Payment", "Principal", "Interest", "Fee", "Total");
    println!("{}", "-".repeat(61));
    for row in rows {
        let label = if row.is_total() { "Total".to_string() } else { row.payment_number.to_string() };
        println!("{:>7} {:>14.2} {:>12.2} {:>10.2} {:>14.2}", label, row.principal, row.interest, row.fee, row.total_amount);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let service = LoanService::from_env();

    let (operation, request, csv_path) = match cli.command {
        Command::Repayments { loan, payment_number, csv } => {
            (Operation::LoanRepayments, loan.into_request(payment_number), csv)
        }
        Command::Total { loan } => (Operation::TotalSum, loan.into_request(None), None),
        Command::EffectiveRate { loan } => (Operation::EffectiveInterestRate, loan.into_request(None), None),
    };

    if cli.json {
        let body = service.handle(operation, &request)?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    print_header(&request);

    match operation {
        Operation::LoanRepayments => {
            let schedule = match service.loan_repayments(&request)? {
                Repayments::Schedule(schedule) => schedule,
                Repayments::Single(row) => Schedule { payments: vec![row] },
            };
            print_rows(&schedule.payments);

            if let Some(path) = csv_path {
                let file = File::create(&path)
                    .with_context(|| format!("Unable to create CSV file {}", path.display()))?;
                schedule.write_csv(file).context("Failed to write schedule CSV")?;
                println!("\nSchedule written to: {}", path.display());
            }
        }
        Operation::TotalSum => {
            let total = service.total_sum(&request)?;
            print_rows(&[total]);
        }
        Operation::EffectiveInterestRate => {
            let rate = service.effective_interest_rate(&request)?;
            println!("Effective annual rate: {:.6}%", rate * 100.0);
        }
    }

    Ok(())
}
