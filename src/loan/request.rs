//! Loan request structures matching the public request schema

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LoanError, Result};

fn default_principal() -> f64 { 10_000.0 }
fn default_rate() -> f64 { 2.5 }
fn default_num_payments() -> u32 { 12 }
fn default_initial_fee() -> f64 { 100.0 }
fn default_payment_fee() -> f64 { 3.0 }

/// Longest schedule accepted: 100 years of monthly payments
pub const MAX_NUM_PAYMENTS: u32 = 1200;

/// Any JSON integer is accepted as a selector; values outside the schedule
/// are rejected later as out of range rather than as malformed input.
fn deserialize_payment_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Selector {
        Signed(i64),
        Unsigned(u64),
    }

    Ok(Option::<Selector>::deserialize(deserializer)?.map(|selector| match selector {
        Selector::Signed(k) => k,
        Selector::Unsigned(k) => i64::try_from(k).unwrap_or(i64::MAX),
    }))
}

/// Loan structuring policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    /// Constant payment, principal share grows as the balance declines
    #[default]
    Annuity,
    /// Constant principal, interest declines with the balance
    FixedAmortization,
    /// Same payment formula as annuity, kept as its own named policy
    FixedPayment,
}

impl LoanType {
    /// Get the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Annuity => "annuity",
            LoanType::FixedAmortization => "fixed_amortization",
            LoanType::FixedPayment => "fixed_payment",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanType {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "annuity" => Ok(LoanType::Annuity),
            "fixed_amortization" => Ok(LoanType::FixedAmortization),
            "fixed_payment" => Ok(LoanType::FixedPayment),
            other => Err(LoanError::validation(
                "loan_type",
                format!("unknown loan type '{}'", other),
            )),
        }
    }
}

/// Input parameters for a single loan computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Amount borrowed
    #[serde(default = "default_principal")]
    pub principal: f64,

    /// Nominal annual interest rate in percent (2.5 = 2.5%)
    #[serde(default = "default_rate")]
    pub rate: f64,

    /// Number of monthly payments
    #[serde(default = "default_num_payments")]
    pub num_payments: u32,

    #[serde(default)]
    pub loan_type: LoanType,

    /// Fee charged once, with the first payment
    #[serde(default = "default_initial_fee")]
    pub initial_fee: f64,

    /// Fee charged with every payment
    #[serde(default = "default_payment_fee")]
    pub payment_fee: f64,

    /// Lump sum due with the final payment
    #[serde(default)]
    pub balloon_amount: f64,

    /// Restrict output to this payment (1-indexed)
    #[serde(default, deserialize_with = "deserialize_payment_number")]
    pub payment_number: Option<i64>,
}

impl Default for LoanRequest {
    fn default() -> Self {
        Self {
            principal: default_principal(),
            rate: default_rate(),
            num_payments: default_num_payments(),
            loan_type: LoanType::default(),
            initial_fee: default_initial_fee(),
            payment_fee: default_payment_fee(),
            balloon_amount: 0.0,
            payment_number: None,
        }
    }
}

impl LoanRequest {
    /// Parse a request from a JSON body; an empty body yields all defaults
    pub fn from_json(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        let request: LoanRequest = serde_json::from_str(body)?;
        Ok(request)
    }

    /// Monthly interest rate as a decimal
    pub fn periodic_rate(&self) -> f64 {
        self.rate / 12.0 / 100.0
    }

    /// Check the request against the schema constraints
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("principal", self.principal),
            ("rate", self.rate),
            ("initial_fee", self.initial_fee),
            ("payment_fee", self.payment_fee),
            ("balloon_amount", self.balloon_amount),
        ];

        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(LoanError::validation(field, "must be a finite number"));
            }
        }

        if self.principal <= 0.0 {
            return Err(LoanError::validation("principal", "must be positive"));
        }

        // Negative rates are allowed as long as the periodic rate stays above -100%
        if self.periodic_rate() <= -1.0 {
            return Err(LoanError::validation("rate", "must be greater than -1200 percent"));
        }

        if self.balloon_amount < 0.0 {
            return Err(LoanError::validation("balloon_amount", "must not be negative"));
        }

        if self.num_payments == 0 {
            return Err(LoanError::validation("num_payments", "must be at least 1"));
        }

        if self.num_payments > MAX_NUM_PAYMENTS {
            return Err(LoanError::validation(
                "num_payments",
                format!("must be at most {}", MAX_NUM_PAYMENTS),
            ));
        }

        Ok(())
    }
}
