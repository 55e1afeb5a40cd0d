//! Internal Rate of Return (IRR) calculation
//!
//! Used to derive the effective annual rate from a loan's cash flows

use log::{debug, warn};

use crate::config::SolverConfig;
use crate::error::{LoanError, Result};

/// Lower bound of the periodic rate search (-99%)
const MIN_RATE: f64 = -0.99;

/// Upper bound of the periodic rate search (1000%)
const MAX_RATE: f64 = 10.0;

/// Solve for the periodic rate at which the cash flows have zero NPV,
/// using Newton-Raphson with a bisection fallback.
///
/// # Arguments
/// * `cashflows` - Cash flows per period, index 0 at time zero (positive = inflow, negative = outflow)
/// * `config` - Initial guess, tolerance and iteration cap
///
/// # Returns
/// * `Result<f64>` - Periodic IRR as a decimal, or a computation error if no root exists
pub fn solve_periodic_irr(cashflows: &[f64], config: &SolverConfig) -> Result<f64> {
    if cashflows.len() < 2 {
        return Err(LoanError::Computation(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    if cashflows.iter().any(|cf| !cf.is_finite()) {
        return Err(LoanError::Computation("cash flows must be finite".into()));
    }

    // Check if there's at least one sign change (required for IRR to exist)
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return Err(LoanError::Computation(
            "cash flows have no sign change, IRR is undefined".into(),
        ));
    }

    let mut rate = config.initial_guess;

    for iteration in 0..config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 || !dnpv.is_finite() {
            debug!("IRR derivative vanished at iteration {}, switching to bisection", iteration);
            return solve_by_bisection(cashflows, config);
        }

        // Bound the rate to reasonable values
        let new_rate = (rate - npv / dnpv).clamp(MIN_RATE, MAX_RATE);

        if (new_rate - rate).abs() < config.tolerance {
            debug!("IRR converged to {:.10} after {} iterations", new_rate, iteration + 1);
            return Ok(new_rate);
        }

        rate = new_rate;
    }

    warn!("Newton-Raphson did not converge after {} iterations, trying bisection", config.max_iterations);
    solve_by_bisection(cashflows, config)
}

/// Convert a periodic rate to an effective annual rate
pub fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (discount * (1.0 + rate));
        }
    }

    (npv, dnpv)
}

/// Fallback IRR calculation using bisection over [MIN_RATE, MAX_RATE]
fn solve_by_bisection(cashflows: &[f64], config: &SolverConfig) -> Result<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;

    let mut npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    // Check that we have a root in this interval
    if npv_low.is_nan() || npv_high.is_nan() || npv_low * npv_high > 0.0 {
        return Err(LoanError::Computation(
            "no real IRR root between -99% and 1000% per period".into(),
        ));
    }

    for _ in 0..config.max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < config.tolerance || (high - low) / 2.0 < config.tolerance {
            return Ok(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    Err(LoanError::Computation(format!(
        "IRR did not converge after {} iterations",
        config.max_iterations
    )))
}

/// Calculate NPV at a given periodic rate
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
