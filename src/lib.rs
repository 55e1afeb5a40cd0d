//! Loan Calculator - Amortization schedules and effective interest rates
//!
//! This library provides:
//! - Monthly repayment schedules for annuity, fixed amortization and fixed payment loans
//! - Initial fees, per-payment fees and balloon payments
//! - Aggregate totals over a schedule
//! - Effective annual interest rate from the internal rate of return of all cash flows

pub mod error;
pub mod config;
pub mod loan;
pub mod amortization;
pub mod rate;
pub mod service;

// Re-export commonly used types
pub use error::{LoanError, Result};
pub use config::SolverConfig;
pub use loan::{LoanRequest, LoanType};
pub use amortization::{AmortizationEngine, PaymentDetail, Repayments, Schedule};
pub use rate::compute_effective_annual_rate;
pub use service::{LoanService, Operation};
