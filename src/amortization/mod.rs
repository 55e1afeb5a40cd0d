//! Amortization engine for per-payment repayment schedules

mod state;
mod engine;
mod schedule;
pub mod policy;

pub use state::ScheduleState;
pub use engine::{AmortizationEngine, ScheduleIter, Repayments, compute_schedule, compute_total};
pub use schedule::{PaymentDetail, Schedule, TOTAL_PAYMENT_NUMBER};
pub use policy::RepaymentPolicy;
