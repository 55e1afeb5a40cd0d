//! Loan request structures and batch loading

mod request;
pub mod loader;

pub use request::{LoanRequest, LoanType, MAX_NUM_PAYMENTS};
pub use loader::{load_requests, load_requests_from_reader};
