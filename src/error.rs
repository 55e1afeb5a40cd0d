//! Error types for loan calculations

use thiserror::Error;

/// Errors raised while validating a request or computing its results
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoanError {
    /// Malformed or out-of-domain input, rejected before the engine runs
    #[error("Invalid input: {field} - {reason}")]
    Validation { field: String, reason: String },

    /// The requested payment number is not part of the schedule
    #[error("Payment number {payment_number} is out of range (schedule has {num_payments} payments).")]
    OutOfRange { payment_number: i64, num_payments: u32 },

    /// The rate solver found no real root for the cash flows
    #[error("Computation error: {0}")]
    Computation(String),
}

impl LoanError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        LoanError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status code used when this error is surfaced over HTTP
    pub fn status_code(&self) -> u16 {
        match self {
            LoanError::Validation { .. } => 400,
            LoanError::OutOfRange { .. } => 404,
            LoanError::Computation(_) => 500,
        }
    }
}

impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        LoanError::validation("body", e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
