//! Evaluate a batch of loan requests from CSV
//!
//! Usage: run_batch [INPUT_CSV] [OUTPUT_CSV]
//! Defaults to loan_requests.csv and batch_output.csv.
//! Outputs one row per request with schedule totals and the effective rate.

use anyhow::{anyhow, Context};
use loan_calculator::loan::load_requests;
use loan_calculator::{LoanRequest, LoanService};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

/// Summary of one request, or the reason it failed
#[derive(Debug, Clone, Default, Serialize)]
struct BatchRow {
    row: usize,
    loan_type: String,
    principal: f64,
    rate: f64,
    num_payments: u32,
    total_principal: Option<f64>,
    total_interest: Option<f64>,
    total_fee: Option<f64>,
    total_amount: Option<f64>,
    effective_rate_pct: Option<f64>,
    error: Option<String>,
}

fn evaluate(service: &LoanService, row: usize, request: &LoanRequest) -> BatchRow {
    let mut out = BatchRow {
        row,
        loan_type: request.loan_type.to_string(),
        principal: request.principal,
        rate: request.rate,
        num_payments: request.num_payments,
        ..Default::default()
    };

    let total = match service.total_sum(request) {
        Ok(total) => total,
        Err(e) => {
            out.error = Some(e.to_string());
            return out;
        }
    };

    out.total_principal = Some(total.principal);
    out.total_interest = Some(total.interest);
    out.total_fee = Some(total.fee);
    out.total_amount = Some(total.total_amount);

    match service.effective_interest_rate(request) {
        Ok(rate) => out.effective_rate_pct = Some(rate * 100.0),
        Err(e) => out.error = Some(e.to_string()),
    }

    out
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let input_path = args.next().unwrap_or_else(|| "loan_requests.csv".to_string());
    let output_path = args.next().unwrap_or_else(|| "batch_output.csv".to_string());

    let start = Instant::now();
    println!("Loading requests from {}...", input_path);

    let requests = load_requests(&input_path)
        .map_err(|e| anyhow!("Failed to load requests from {}: {}", input_path, e))?;
    println!("Loaded {} requests in {:?}", requests.len(), start.elapsed());

    let service = LoanService::from_env();

    // Requests are independent, evaluate in parallel
    let calc_start = Instant::now();
    let results: Vec<BatchRow> = requests
        .par_iter()
        .enumerate()
        .map(|(i, request)| evaluate(&service, i + 1, request))
        .collect();
    println!("Evaluated in {:?}", calc_start.elapsed());

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("Failed to create output file {}", output_path))?;
    for row in &results {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", output_path);

    let failures = results.iter().filter(|r| r.error.is_some()).count();
    println!("\nBatch Summary:");
    println!("  Requests: {}", results.len());
    println!("  Failed:   {}", failures);
    if let Some(max) = results
        .iter()
        .filter_map(|r| r.effective_rate_pct)
        .max_by(|a, b| a.total_cmp(b))
    {
        println!("  Highest effective rate: {:.4}%", max);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
