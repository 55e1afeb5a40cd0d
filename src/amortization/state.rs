//! Schedule state tracking for a single loan

/// State of a loan at a point in the amortization recurrence
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Current payment number (1-indexed, 0 before the first payment)
    pub payment_number: u32,

    /// Outstanding balance at the start of the current period
    pub remaining_balance: f64,
}

impl ScheduleState {
    /// Initialize state at loan disbursement
    pub fn new(principal: f64) -> Self {
        Self {
            payment_number: 0,
            remaining_balance: principal,
        }
    }

    /// Advance to next period
    pub fn advance(&mut self) {
        self.payment_number += 1;
    }

    pub fn is_first(&self) -> bool {
        self.payment_number == 1
    }

    pub fn is_final(&self, num_payments: u32) -> bool {
        self.payment_number == num_payments
    }

    /// Reduce the balance by the ordinary (non-balloon) principal repaid
    pub fn repay(&mut self, principal: f64) {
        self.remaining_balance -= principal;
    }
}
