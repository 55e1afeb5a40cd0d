//! Per-policy payment formulas

use crate::loan::{LoanRequest, LoanType};

/// Level annuity payment: P·r / (1 − (1+r)^−n)
///
/// The closed form is 0/0 at r = 0, so a zero rate falls back to P/n.
pub fn annuity_payment(principal: f64, periodic_rate: f64, num_payments: u32) -> f64 {
    if periodic_rate == 0.0 {
        return principal / num_payments as f64;
    }
    principal * periodic_rate / (1.0 - (1.0 + periodic_rate).powf(-f64::from(num_payments)))
}

/// Level payment for the fixed payment policy.
///
/// Numerically identical to [`annuity_payment`]; the two policies are kept
/// apart because requests name them separately.
pub fn fixed_payment(principal: f64, periodic_rate: f64, num_payments: u32) -> f64 {
    annuity_payment(principal, periodic_rate, num_payments)
}

/// Constant principal repaid each period under fixed amortization
pub fn fixed_amortization_principal(principal: f64, num_payments: u32) -> f64 {
    principal / num_payments as f64
}

/// Payment rule for one loan, resolved once per request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepaymentPolicy {
    Annuity { payment: f64 },
    FixedPayment { payment: f64 },
    FixedAmortization { principal_payment: f64 },
}

impl RepaymentPolicy {
    pub fn for_request(request: &LoanRequest) -> Self {
        let rate = request.periodic_rate();
        match request.loan_type {
            LoanType::Annuity => RepaymentPolicy::Annuity {
                payment: annuity_payment(request.principal, rate, request.num_payments),
            },
            LoanType::FixedPayment => RepaymentPolicy::FixedPayment {
                payment: fixed_payment(request.principal, rate, request.num_payments),
            },
            LoanType::FixedAmortization => RepaymentPolicy::FixedAmortization {
                principal_payment: fixed_amortization_principal(request.principal, request.num_payments),
            },
        }
    }

    /// Principal and interest due for a period, given the balance at its start
    pub fn split(&self, remaining_balance: f64, periodic_rate: f64) -> (f64, f64) {
        let interest = remaining_balance * periodic_rate;
        match *self {
            RepaymentPolicy::Annuity { payment } | RepaymentPolicy::FixedPayment { payment } => {
                (payment - interest, interest)
            }
            RepaymentPolicy::FixedAmortization { principal_payment } => (principal_payment, interest),
        }
    }

    /// Level payment for annuity-style policies, None when it varies by period
    pub fn level_payment(&self) -> Option<f64> {
        match *self {
            RepaymentPolicy::Annuity { payment } | RepaymentPolicy::FixedPayment { payment } => Some(payment),
            RepaymentPolicy::FixedAmortization { .. } => None,
        }
    }
}
