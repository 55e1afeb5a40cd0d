//! Borrower cash flows implied by a loan request

use crate::amortization::RepaymentPolicy;
use crate::loan::LoanRequest;

/// Build the cash-flow vector for a loan: index 0 is the disbursement
/// (negative), indices 1..=n are the payments including fees and balloon.
pub fn loan_cashflows(request: &LoanRequest) -> Vec<f64> {
    let policy = RepaymentPolicy::for_request(request);
    let periodic_rate = request.periodic_rate();
    let n = request.num_payments;

    let mut cashflows = Vec::with_capacity(n as usize + 1);
    cashflows.push(-request.principal);

    let mut remaining_balance = request.principal;

    for period in 1..=n {
        let payment = policy.level_payment().unwrap_or_else(|| {
            let (principal, interest) = policy.split(remaining_balance, periodic_rate);
            remaining_balance -= principal;
            principal + interest
        });

        let mut flow = payment + request.payment_fee;
        if period == 1 {
            flow += request.initial_fee;
        }
        if period == n {
            flow += request.balloon_amount;
        }
        cashflows.push(flow);
    }

    cashflows
}
