use crate::errors::{LedgerError, Result};
use crate::money::Money;
use crate::state::Loan;
use crate::types::{InstallmentId, InstallmentStatus, LoanId, LoanStatus};

/// how a repayment landed on one installment
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentApplication {
    pub installment_id: InstallmentId,
    pub sequence: u32,
    pub applied: Money,
    pub outstanding_after: Money,
    pub status_after: InstallmentStatus,
}

/// result of allocating one repayment across a loan's schedule
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub loan_id: LoanId,
    pub amount: Money,
    pub applications: Vec<InstallmentApplication>,
    pub outstanding_after: Money,
    pub settles_loan: bool,
}

/// repayment allocator
///
/// Applies a payment across the loan's unpaid installments in ascending
/// due-date order until the payment is exhausted. Payments always settle the
/// oldest outstanding obligation first; there is no way to target a specific
/// installment.
pub struct RepaymentAllocator;

impl RepaymentAllocator {
    /// allocate a repayment against the loan, mutating it in place
    ///
    /// All rejections happen before any mutation: a failed call leaves the
    /// loan untouched. The precondition `amount <= outstanding` guarantees
    /// the waterfall can always absorb the full payment, so the loop never
    /// fails partway.
    pub fn allocate(loan: &mut Loan, amount: Money) -> Result<Allocation> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidRepaymentAmount { amount });
        }
        if loan.status == LoanStatus::Repaid {
            return Err(LedgerError::AlreadyRepaid {
                loan_id: loan.loan_id,
            });
        }
        if amount > loan.outstanding_amount {
            return Err(LedgerError::AmountExceedsOutstanding {
                outstanding: loan.outstanding_amount,
                requested: amount,
            });
        }

        let mut remaining = amount;
        let mut applications = Vec::new();

        // installments are kept in ascending due-date order
        for installment in loan.installments.iter_mut() {
            if installment.status == InstallmentStatus::Repaid {
                continue;
            }
            if remaining.is_zero() {
                break;
            }

            let applied = remaining.min(installment.outstanding_amount);
            installment.outstanding_amount -= applied;
            installment.status =
                InstallmentStatus::derive(installment.outstanding_amount, installment.amount);
            remaining -= applied;

            applications.push(InstallmentApplication {
                installment_id: installment.installment_id,
                sequence: installment.sequence,
                applied,
                outstanding_after: installment.outstanding_amount,
                status_after: installment.status,
            });
        }

        loan.outstanding_amount -= amount;
        loan.status = LoanStatus::derive(loan.outstanding_amount);

        debug_assert!(remaining.is_zero());
        debug_assert_eq!(loan.outstanding_amount, loan.installment_outstanding_total());

        Ok(Allocation {
            loan_id: loan.loan_id,
            amount,
            applications,
            outstanding_after: loan.outstanding_amount,
            settles_loan: loan.status == LoanStatus::Repaid,
        })
    }
}
