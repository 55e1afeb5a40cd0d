//! Core amortization engine for monthly repayment schedules

use log::debug;
use serde::Serialize;

use crate::error::{LoanError, Result};
use crate::loan::LoanRequest;
use super::policy::RepaymentPolicy;
use super::schedule::{PaymentDetail, Schedule};
use super::state::ScheduleState;

/// Output of a repayment request: the whole schedule or the one selected row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Repayments {
    Schedule(Schedule),
    Single(PaymentDetail),
}

/// Main amortization engine
#[derive(Debug, Clone)]
pub struct AmortizationEngine {
    request: LoanRequest,
    policy: RepaymentPolicy,
    periodic_rate: f64,
}

impl AmortizationEngine {
    /// Create an engine for one request, resolving its payment policy
    pub fn new(request: &LoanRequest) -> Self {
        Self {
            request: request.clone(),
            policy: RepaymentPolicy::for_request(request),
            periodic_rate: request.periodic_rate(),
        }
    }

    /// Lazy iterator over the payment rows
    pub fn payments(&self) -> ScheduleIter<'_> {
        ScheduleIter {
            engine: self,
            state: ScheduleState::new(self.request.principal),
        }
    }

    /// Run the full schedule
    pub fn project(&self) -> Schedule {
        self.payments().collect()
    }

    /// Row for a single 1-indexed payment number
    pub fn payment(&self, payment_number: i64) -> Result<PaymentDetail> {
        let found = match usize::try_from(payment_number) {
            Ok(k) if k >= 1 => self.payments().nth(k - 1),
            _ => None,
        };

        found.ok_or(LoanError::OutOfRange {
            payment_number,
            num_payments: self.request.num_payments,
        })
    }

    /// Calculate the row for the current period and advance the balance
    fn calculate_period(&self, state: &mut ScheduleState) -> PaymentDetail {
        let request = &self.request;

        let mut fee = request.payment_fee;
        if state.is_first() {
            fee += request.initial_fee;
        }

        let (ordinary_principal, interest) = self.policy.split(state.remaining_balance, self.periodic_rate);
        let mut principal = ordinary_principal;
        let mut total_amount = principal + interest + fee;

        // Balloon is paid on top of the final payment, not amortized
        if state.is_final(request.num_payments) {
            total_amount += request.balloon_amount;
            principal += request.balloon_amount;
        }

        state.repay(ordinary_principal);

        PaymentDetail::new(state.payment_number, principal, interest, fee, total_amount)
    }
}

/// Iterator producing one [`PaymentDetail`] per period
#[derive(Debug, Clone)]
pub struct ScheduleIter<'a> {
    engine: &'a AmortizationEngine,
    state: ScheduleState,
}

impl Iterator for ScheduleIter<'_> {
    type Item = PaymentDetail;

    fn next(&mut self) -> Option<PaymentDetail> {
        if self.state.payment_number >= self.engine.request.num_payments {
            return None;
        }
        self.state.advance();
        Some(self.engine.calculate_period(&mut self.state))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.engine.request.num_payments - self.state.payment_number) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScheduleIter<'_> {}

/// Compute the repayment schedule, or the single row selected by `payment_number`
pub fn compute_schedule(request: &LoanRequest) -> Result<Repayments> {
    let engine = AmortizationEngine::new(request);
    debug!(
        "Amortizing {} loan: principal={:.2} rate={}% payments={}",
        request.loan_type, request.principal, request.rate, request.num_payments
    );

    match request.payment_number {
        Some(k) => engine.payment(k).map(Repayments::Single),
        None => Ok(Repayments::Schedule(engine.project())),
    }
}

/// Aggregate the full schedule into a single total row
pub fn compute_total(request: &LoanRequest) -> PaymentDetail {
    AmortizationEngine::new(request).project().total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::policy::annuity_payment;
    use crate::loan::LoanType;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn request(loan_type: LoanType) -> LoanRequest {
        LoanRequest {
            loan_type,
            ..Default::default()
        }
    }

    fn full_schedule(request: &LoanRequest) -> Schedule {
        match compute_schedule(request).unwrap() {
            Repayments::Schedule(schedule) => schedule,
            Repayments::Single(_) => panic!("expected full schedule"),
        }
    }

    #[test]
    fn test_schedule_length_and_numbering() {
        let schedule = full_schedule(&request(LoanType::Annuity));
        assert_eq!(schedule.len(), 12);
        for (i, row) in schedule.payments.iter().enumerate() {
            assert_eq!(row.payment_number as usize, i + 1);
        }
    }

    #[test]
    fn test_annuity_principal_sums_to_loan() {
        for loan_type in [LoanType::Annuity, LoanType::FixedPayment] {
            let req = LoanRequest { balloon_amount: 2_500.0, ..request(loan_type) };
            let schedule = full_schedule(&req);
            let principal: f64 = schedule.payments.iter().map(|r| r.principal).sum();
            assert_abs_diff_eq!(principal - req.balloon_amount, req.principal, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_annuity_total_is_level() {
        let req = LoanRequest { initial_fee: 0.0, payment_fee: 0.0, ..request(LoanType::Annuity) };
        let payment = annuity_payment(req.principal, req.periodic_rate(), req.num_payments);
        for row in full_schedule(&req).payments {
            assert_relative_eq!(row.total_amount, payment, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_first_payment_matches_hand_computed_annuity() {
        // P=10000, 2.5%, 12 payments, fees 100 + 3
        let req = request(LoanType::Annuity);
        let first = full_schedule(&req).payments[0];

        let r = 2.5 / 12.0 / 100.0;
        let annuity = 10_000.0 * r / (1.0 - (1.0_f64 + r).powi(-12));
        assert!((first.interest - 10_000.0 * r).abs() < 1e-9);
        assert!((first.principal - (annuity - first.interest)).abs() < 1e-9);
        assert!((first.fee - 103.0).abs() < 1e-12);
        assert!((first.total_amount - (annuity + 103.0)).abs() < 1e-9);
        assert!((first.total_amount - 947.6611).abs() < 1e-4);
    }

    #[test]
    fn test_fees_after_first_period() {
        let schedule = full_schedule(&request(LoanType::Annuity));
        assert!(schedule.payments[1..].iter().all(|r| (r.fee - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_fixed_amortization_constant_principal() {
        let req = LoanRequest { principal: 9_000.0, rate: 6.0, ..request(LoanType::FixedAmortization) };
        let schedule = full_schedule(&req);
        let expected = 9_000.0 / 12.0;
        for row in &schedule.payments {
            assert_eq!(row.principal, expected);
        }

        // Interest declines with the balance
        assert!((schedule.payments[0].interest - 45.0).abs() < 1e-9);
        assert!((schedule.payments[11].interest - expected * 0.005).abs() < 1e-9);
        assert!(schedule.payments.windows(2).all(|w| w[1].interest < w[0].interest));
    }

    #[test]
    fn test_zero_rate_fixed_payment() {
        let req = LoanRequest {
            principal: 12_000.0,
            rate: 0.0,
            initial_fee: 0.0,
            payment_fee: 0.0,
            ..request(LoanType::FixedPayment)
        };
        for row in full_schedule(&req).payments {
            assert_relative_eq!(row.principal, 1000.0, max_relative = 1e-12);
            assert_eq!(row.interest, 0.0);
        }
    }

    #[test]
    fn test_zero_rate_is_finite_for_every_policy() {
        for loan_type in [LoanType::Annuity, LoanType::FixedAmortization, LoanType::FixedPayment] {
            let req = LoanRequest { rate: 0.0, ..request(loan_type) };
            let schedule = full_schedule(&req);
            assert!(schedule.payments.iter().all(|r| r.total_amount.is_finite()));
            assert_abs_diff_eq!(schedule.total().principal, 10_000.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_balloon_on_final_payment_only() {
        let base = request(LoanType::FixedAmortization);
        let with_balloon = LoanRequest { balloon_amount: 1_500.0, ..base.clone() };

        let plain = full_schedule(&base);
        let balloon = full_schedule(&with_balloon);

        for (a, b) in plain.payments[..11].iter().zip(&balloon.payments[..11]) {
            assert_eq!(a, b);
        }
        let last_plain = plain.payments[11];
        let last_balloon = balloon.payments[11];
        assert_relative_eq!(last_balloon.total_amount - last_plain.total_amount, 1_500.0, max_relative = 1e-12);
        assert_relative_eq!(last_balloon.principal - last_plain.principal, 1_500.0, max_relative = 1e-12);
        assert_eq!(last_balloon.interest, last_plain.interest);
    }

    #[test]
    fn test_balance_reaches_zero_before_balloon() {
        let req = LoanRequest { balloon_amount: 4_000.0, ..request(LoanType::Annuity) };
        let engine = AmortizationEngine::new(&req);
        let mut iter = engine.payments();
        for _ in iter.by_ref() {}
        assert_abs_diff_eq!(iter.state.remaining_balance, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_single_payment_loan() {
        let req = LoanRequest {
            num_payments: 1,
            balloon_amount: 500.0,
            ..request(LoanType::Annuity)
        };
        let schedule = full_schedule(&req);
        assert_eq!(schedule.len(), 1);

        let row = schedule.payments[0];
        let interest = 10_000.0 * req.periodic_rate();
        assert_relative_eq!(row.fee, 103.0);
        assert_relative_eq!(row.interest, interest, max_relative = 1e-12);
        assert_relative_eq!(row.principal, 10_500.0, max_relative = 1e-12);
        assert_relative_eq!(row.total_amount, 10_500.0 + interest + 103.0, max_relative = 1e-12);
    }

    #[test]
    fn test_payment_number_selects_row() {
        let req = request(LoanType::FixedAmortization);
        let schedule = full_schedule(&req);

        for k in [1, 6, 12] {
            let selected = LoanRequest { payment_number: Some(k), ..req.clone() };
            match compute_schedule(&selected).unwrap() {
                Repayments::Single(row) => assert_eq!(row, schedule.payments[k as usize - 1]),
                Repayments::Schedule(_) => panic!("expected single payment"),
            }
        }
    }

    #[test]
    fn test_payment_number_out_of_range() {
        for k in [-1, 0, 13, i64::MAX] {
            let req = LoanRequest { payment_number: Some(k), ..request(LoanType::Annuity) };
            assert_eq!(
                compute_schedule(&req).unwrap_err(),
                LoanError::OutOfRange { payment_number: k, num_payments: 12 }
            );
        }
    }

    #[test]
    fn test_compute_total_matches_schedule_sum() {
        let req = LoanRequest { balloon_amount: 800.0, payment_number: Some(3), ..request(LoanType::Annuity) };
        let total = compute_total(&req);
        let schedule = AmortizationEngine::new(&req).project();

        assert_eq!(total.payment_number, 0);
        assert_relative_eq!(total.principal, schedule.payments.iter().map(|r| r.principal).sum::<f64>());
        assert_relative_eq!(total.interest, schedule.payments.iter().map(|r| r.interest).sum::<f64>());
        assert_relative_eq!(total.fee, 100.0 + 12.0 * 3.0, max_relative = 1e-12);
        assert_relative_eq!(total.total_amount, schedule.payments.iter().map(|r| r.total_amount).sum::<f64>());
    }

    #[test]
    fn test_iterator_size_hint() {
        let engine = AmortizationEngine::new(&request(LoanType::Annuity));
        let mut iter = engine.payments();
        assert_eq!(iter.len(), 12);
        iter.next();
        assert_eq!(iter.len(), 11);
    }
}
