//! Request operations shared by the HTTP handler, CLI and batch runner
//!
//! Holds the solver configuration once, then serves any number of
//! independent requests against it.
//!
//! # Example
//! ```ignore
//! let service = LoanService::from_env();
//! let request = LoanRequest::from_json(r#"{"loan_type": "fixed_payment"}"#)?;
//! let total = service.total_sum(&request)?;
//! ```

use log::info;
use serde_json::Value;

use crate::amortization::{compute_schedule, compute_total, PaymentDetail, Repayments};
use crate::config::SolverConfig;
use crate::error::{LoanError, Result};
use crate::loan::LoanRequest;
use crate::rate::compute_effective_annual_rate;

/// The three request/response operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoanRepayments,
    TotalSum,
    EffectiveInterestRate,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::LoanRepayments,
        Operation::TotalSum,
        Operation::EffectiveInterestRate,
    ];

    /// Route path for this operation
    pub fn path(&self) -> &'static str {
        match self {
            Operation::LoanRepayments => "/loan_repayments",
            Operation::TotalSum => "/total_sum",
            Operation::EffectiveInterestRate => "/effective_interest_rate",
        }
    }

    /// Match a request path, ignoring a trailing slash and any stage prefix
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        Self::ALL.into_iter().find(|op| trimmed.ends_with(op.path()))
    }
}

/// Loan calculation service
#[derive(Debug, Clone, Default)]
pub struct LoanService {
    solver: SolverConfig,
}

impl LoanService {
    pub fn new(solver: SolverConfig) -> Self {
        Self { solver }
    }

    /// Create service with solver settings from the environment
    pub fn from_env() -> Self {
        Self::new(SolverConfig::from_env())
    }

    /// Full schedule, or the single payment selected by `payment_number`
    pub fn loan_repayments(&self, request: &LoanRequest) -> Result<Repayments> {
        request.validate()?;
        compute_schedule(request)
    }

    /// Totals over the full schedule; `payment_number` is ignored
    pub fn total_sum(&self, request: &LoanRequest) -> Result<PaymentDetail> {
        request.validate()?;
        Ok(compute_total(request))
    }

    /// Effective annual interest rate as a decimal
    pub fn effective_interest_rate(&self, request: &LoanRequest) -> Result<f64> {
        request.validate()?;
        compute_effective_annual_rate(request, &self.solver)
    }

    /// Run an operation against a parsed request and return the JSON response body
    pub fn handle(&self, operation: Operation, request: &LoanRequest) -> Result<Value> {
        info!("{} {} payments={}", operation.path(), request.loan_type, request.num_payments);

        let body = match operation {
            Operation::LoanRepayments => serde_json::to_value(self.loan_repayments(request)?),
            Operation::TotalSum => serde_json::to_value(self.total_sum(request)?),
            Operation::EffectiveInterestRate => serde_json::to_value(self.effective_interest_rate(request)?),
        };

        body.map_err(|e| LoanError::Computation(format!("response is not representable as JSON: {}", e)))
    }

    /// Parse a JSON body and run an operation against it
    pub fn handle_json(&self, operation: Operation, body: &str) -> Result<Value> {
        let request = LoanRequest::from_json(body)?;
        self.handle(operation, &request)
    }
}
