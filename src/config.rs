//! Runtime configuration for the rate solver
//!
//! Read from environment variables, falling back to defaults when a value is
//! missing or does not parse:
//!   IRR_INITIAL_GUESS, IRR_TOLERANCE, IRR_MAX_ITERATIONS

use std::env;

/// Payment periods per year; every schedule is monthly
pub const PERIODS_PER_YEAR: u32 = 12;

/// Settings for the internal rate of return solve
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Starting periodic rate for Newton-Raphson
    pub initial_guess: f64,

    /// Convergence threshold on the rate step (Newton) or bracket width (bisection)
    pub tolerance: f64,

    /// Iteration cap for each of the two methods
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.05 / PERIODS_PER_YEAR as f64, // 5% annual / periods
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }
}

impl SolverConfig {
    /// Build from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();

        let initial_guess: f64 = lookup("IRR_INITIAL_GUESS")
            .and_then(|s| s.parse().ok())
            .filter(|g: &f64| g.is_finite() && *g > -1.0)
            .unwrap_or(defaults.initial_guess);

        let tolerance: f64 = lookup("IRR_TOLERANCE")
            .and_then(|s| s.parse().ok())
            .filter(|t: &f64| t.is_finite() && *t > 0.0)
            .unwrap_or(defaults.tolerance);

        let max_iterations: u32 = lookup("IRR_MAX_ITERATIONS")
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(defaults.max_iterations);

        Self {
            initial_guess,
            tolerance,
            max_iterations,
        }
    }
}
