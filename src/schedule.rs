use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::money::Money;
use crate::state::ScheduledInstallment;
use crate::types::{CurrencyCode, InstallmentStatus, LoanId};

/// amortization schedule for an installment loan
///
/// The principal is split into `term_count` equal installments by truncating
/// division; the remainder lands on the final installment so the schedule
/// always sums exactly to the principal.
#[derive(Debug, Clone)]
pub struct InstallmentSchedule {
    pub loan_id: LoanId,
    pub principal: Money,
    pub term_count: u32,
    pub start_date: DateTime<Utc>,
    pub installments: Vec<ScheduledInstallment>,
}

impl InstallmentSchedule {
    /// generate the schedule for a loan
    ///
    /// Installment `i` (1-based) falls due `i` calendar months after
    /// `start_date`, keeping the day of month where the target month allows
    /// it and clamping to month end where it does not.
    pub fn generate(
        loan_id: LoanId,
        principal: Money,
        currency: CurrencyCode,
        term_count: u32,
        start_date: DateTime<Utc>,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LedgerError::InvalidPrincipal { amount: principal });
        }
        if term_count < 1 {
            return Err(LedgerError::InvalidTermCount { term_count });
        }

        let (base, remainder) = principal.div_rem(term_count);

        let mut installments = Vec::with_capacity(term_count as usize);
        for sequence in 1..=term_count {
            let is_last = sequence == term_count;
            let amount = if is_last { base + remainder } else { base };

            installments.push(ScheduledInstallment {
                installment_id: Uuid::new_v4(),
                loan_id,
                sequence,
                amount,
                outstanding_amount: amount,
                due_date: add_months(start_date, sequence)?,
                currency: currency.clone(),
                status: InstallmentStatus::Due,
            });
        }

        Ok(Self {
            loan_id,
            principal,
            term_count,
            start_date,
            installments,
        })
    }

    /// sum of all installment amounts, always equal to the principal
    pub fn total_amount(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }
}

/// step a date forward by whole calendar months
fn add_months(date: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
    date.checked_add_months(Months::new(months))
        .ok_or(LedgerError::DueDateOverflow {
            start_date: date,
            months,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use proptest::prelude::*;

    fn start_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 20, 0, 0, 0).unwrap()
    }

    fn generate(principal: i64, terms: u32) -> Result<InstallmentSchedule> {
        InstallmentSchedule::generate(
            Uuid::new_v4(),
            Money::from_minor(principal),
            CurrencyCode::new("EUR"),
            terms,
            start_date(),
        )
    }

    fn amounts(schedule: &InstallmentSchedule) -> Vec<i64> {
        schedule
            .installments
            .iter()
            .map(|i| i.amount.as_minor())
            .collect()
    }

    #[test]
    fn test_remainder_lands_on_last_installment() {
        let schedule = generate(5000, 3).unwrap();
        assert_eq!(amounts(&schedule), vec![1666, 1666, 1668]);

        let schedule = generate(5000, 6).unwrap();
        assert_eq!(amounts(&schedule), vec![833, 833, 833, 833, 833, 835]);

        let schedule = generate(4, 3).unwrap();
        assert_eq!(amounts(&schedule), vec![1, 1, 2]);
    }

    #[test]
    fn test_exact_division_has_no_remainder() {
        let schedule = generate(6000, 3).unwrap();
        assert_eq!(amounts(&schedule), vec![2000, 2000, 2000]);
    }

    #[test]
    fn test_single_term_gets_whole_principal() {
        let schedule = generate(5000, 1).unwrap();
        assert_eq!(amounts(&schedule), vec![5000]);
    }

    #[test]
    fn test_due_dates_step_by_one_month() {
        let schedule = generate(5000, 3).unwrap();

        let expected = [
            Utc.with_ymd_and_hms(2022, 2, 20, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2022, 3, 20, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2022, 4, 20, 0, 0, 0).unwrap(),
        ];

        for (installment, expected) in schedule.installments.iter().zip(expected) {
            assert_eq!(installment.due_date, expected);
        }
    }

    #[test]
    fn test_month_end_clamping() {
        let start = Utc.with_ymd_and_hms(2022, 1, 31, 0, 0, 0).unwrap();
        let schedule = InstallmentSchedule::generate(
            Uuid::new_v4(),
            Money::from_minor(3000),
            CurrencyCode::new("EUR"),
            3,
            start,
        )
        .unwrap();

        // february has no 31st, later months return to it
        assert_eq!(schedule.installments[0].due_date.day(), 28);
        assert_eq!(schedule.installments[1].due_date.day(), 31);
        assert_eq!(schedule.installments[2].due_date.day(), 30);
    }

    #[test]
    fn test_installments_start_due_and_fully_outstanding() {
        let schedule = generate(5000, 3).unwrap();

        for installment in &schedule.installments {
            assert_eq!(installment.status, InstallmentStatus::Due);
            assert_eq!(installment.outstanding_amount, installment.amount);
            assert!(installment.amount.is_positive());
        }
    }

    #[test]
    fn test_sequences_are_one_based_and_ascending() {
        let schedule = generate(5000, 6).unwrap();

        for (idx, installment) in schedule.installments.iter().enumerate() {
            assert_eq!(installment.sequence, idx as u32 + 1);
        }
        for pair in schedule.installments.windows(2) {
            assert!(pair[0].due_date < pair[1].due_date);
        }
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        assert!(matches!(
            generate(0, 3),
            Err(LedgerError::InvalidPrincipal { .. })
        ));
        assert!(matches!(
            generate(-100, 3),
            Err(LedgerError::InvalidPrincipal { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_terms() {
        assert!(matches!(
            generate(5000, 0),
            Err(LedgerError::InvalidTermCount { term_count: 0 })
        ));
    }

    proptest! {
        /// installment amounts always sum exactly to the principal
        #[test]
        fn prop_schedule_sums_to_principal(
            principal in 1i64..1_000_000_000i64,
            terms in 1u32..120u32,
        ) {
            let schedule = generate(principal, terms).unwrap();

            prop_assert_eq!(schedule.installments.len(), terms as usize);
            prop_assert_eq!(schedule.total_amount(), Money::from_minor(principal));
        }

        /// every installment except the last carries the truncated base amount
        #[test]
        fn prop_remainder_only_on_last(
            principal in 1i64..1_000_000_000i64,
            terms in 2u32..120u32,
        ) {
            let schedule = generate(principal, terms).unwrap();
            let (base, remainder) = Money::from_minor(principal).div_rem(terms);

            for installment in &schedule.installments[..(terms as usize - 1)] {
                prop_assert_eq!(installment.amount, base);
            }
            prop_assert_eq!(
                schedule.installments[terms as usize - 1].amount,
                base + remainder
            );
        }
    }
}
