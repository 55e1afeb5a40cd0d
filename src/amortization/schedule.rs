//! Schedule output structures

use serde::{Deserialize, Serialize};
use std::io::Write;

/// Payment number reserved for aggregate totals
pub const TOTAL_PAYMENT_NUMBER: u32 = 0;

/// A single row of the repayment schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// 1-indexed period, or 0 for an aggregate total
    pub payment_number: u32,
    pub principal: f64,
    pub interest: f64,
    pub fee: f64,
    pub total_amount: f64,
}

impl PaymentDetail {
    pub fn new(payment_number: u32, principal: f64, interest: f64, fee: f64, total_amount: f64) -> Self {
        Self {
            payment_number,
            principal,
            interest,
            fee,
            total_amount,
        }
    }

    /// True for rows produced by [`Schedule::total`]
    pub fn is_total(&self) -> bool {
        self.payment_number == TOTAL_PAYMENT_NUMBER
    }
}

/// Complete repayment schedule, one row per payment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub payments: Vec<PaymentDetail>,
}

impl Schedule {
    pub fn new() -> Self {
        Self { payments: Vec::new() }
    }

    /// Add a payment row
    pub fn add_row(&mut self, row: PaymentDetail) {
        self.payments.push(row);
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Sum every field across the schedule
    pub fn total(&self) -> PaymentDetail {
        self.payments.iter().fold(
            PaymentDetail::new(TOTAL_PAYMENT_NUMBER, 0.0, 0.0, 0.0, 0.0),
            |mut acc, row| {
                acc.principal += row.principal;
                acc.interest += row.interest;
                acc.fee += row.fee;
                acc.total_amount += row.total_amount;
                acc
            },
        )
    }

    /// Write the schedule as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.payments {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl FromIterator<PaymentDetail> for Schedule {
    fn from_iter<I: IntoIterator<Item = PaymentDetail>>(iter: I) -> Self {
        Self {
            payments: iter.into_iter().collect(),
        }
    }
}
