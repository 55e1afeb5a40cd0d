//! Effective annual rate from a loan's full cash-flow stream

mod cashflows;
pub mod irr;

pub use cashflows::loan_cashflows;
pub use irr::{annualize, npv_at_rate, solve_periodic_irr};

use log::debug;

use crate::config::{SolverConfig, PERIODS_PER_YEAR};
use crate::error::Result;
use crate::loan::LoanRequest;

/// Effective annual interest rate (as a decimal) including fees and balloon
pub fn compute_effective_annual_rate(request: &LoanRequest, config: &SolverConfig) -> Result<f64> {
    let cashflows = loan_cashflows(request);
    let periodic = solve_periodic_irr(&cashflows, config)?;
    let annual = annualize(periodic, PERIODS_PER_YEAR);

    debug!(
        "Effective rate for {} loan: periodic={:.10} annual={:.10}",
        request.loan_type, periodic, annual
    );

    Ok(annual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanType;
    use approx::assert_abs_diff_eq;

    fn no_fees(loan_type: LoanType, rate: f64) -> LoanRequest {
        LoanRequest {
            loan_type,
            rate,
            initial_fee: 0.0,
            payment_fee: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_fees_matches_nominal_compounded() {
        for loan_type in [LoanType::Annuity, LoanType::FixedAmortization, LoanType::FixedPayment] {
            for rate in [1.0, 2.5, 7.0] {
                let request = no_fees(loan_type, rate);
                let effective = compute_effective_annual_rate(&request, &SolverConfig::default()).unwrap();
                let expected = (1.0 + rate / 1200.0).powi(12) - 1.0;
                assert_abs_diff_eq!(effective, expected, epsilon = 1e-8);
                assert!(effective > rate / 100.0);
            }
        }
    }

    #[test]
    fn test_zero_rate_no_fees_is_zero() {
        let request = no_fees(LoanType::FixedPayment, 0.0);
        let effective = compute_effective_annual_rate(&request, &SolverConfig::default()).unwrap();
        assert_abs_diff_eq!(effective, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_fees_raise_effective_rate() {
        let plain = no_fees(LoanType::Annuity, 2.5);
        let with_fees = LoanRequest::default();
        let config = SolverConfig::default();

        let plain_rate = compute_effective_annual_rate(&plain, &config).unwrap();
        let fee_rate = compute_effective_annual_rate(&with_fees, &config).unwrap();
        assert!(fee_rate > plain_rate + 0.01, "fees should add over 1%: {} vs {}", fee_rate, plain_rate);
    }

    #[test]
    fn test_balloon_on_zero_rate_loan() {
        // The balloon is paid on top of full amortization
        let request = LoanRequest {
            principal: 1_000.0,
            rate: 0.0,
            num_payments: 12,
            initial_fee: 0.0,
            payment_fee: 0.0,
            balloon_amount: 100.0,
            ..Default::default()
        };
        let effective = compute_effective_annual_rate(&request, &SolverConfig::default()).unwrap();
        assert!(effective > 0.0);
    }
}
