use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{LedgerError, Result};
use crate::state::{Loan, ReceivedRepayment};
use crate::types::LoanId;

/// persistence collaborator for loans and repayment receipts
///
/// Implementations must treat each method as one transactional unit: a loan
/// is inserted together with its installments, and a repayment commit writes
/// the updated loan and appends the receipt as a single batch.
pub trait LoanStore: Send + Sync {
    /// atomically insert a new loan with its full installment schedule
    fn insert_loan(&self, loan: Loan) -> Result<()>;

    /// load a loan, installments in ascending due-date order
    fn fetch_loan(&self, loan_id: LoanId) -> Result<Loan>;

    /// atomically persist an updated loan and append the repayment receipt
    fn commit_repayment(&self, loan: &Loan, receipt: ReceivedRepayment) -> Result<()>;

    /// receipts recorded against a loan, in received order
    fn receipts(&self, loan_id: LoanId) -> Result<Vec<ReceivedRepayment>>;
}

/// in-memory reference store
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    loans: RwLock<HashMap<LoanId, Loan>>,
    receipts: RwLock<HashMap<LoanId, Vec<ReceivedRepayment>>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// number of stored loans
    pub fn loan_count(&self) -> usize {
        self.loans.read().expect("loan map poisoned").len()
    }
}

impl LoanStore for InMemoryLoanStore {
    fn insert_loan(&self, loan: Loan) -> Result<()> {
        let mut loans = self.loans.write().expect("loan map poisoned");
        if loans.contains_key(&loan.loan_id) {
            return Err(LedgerError::DuplicateLoan {
                loan_id: loan.loan_id,
            });
        }
        loans.insert(loan.loan_id, loan);
        Ok(())
    }

    fn fetch_loan(&self, loan_id: LoanId) -> Result<Loan> {
        self.loans
            .read()
            .expect("loan map poisoned")
            .get(&loan_id)
            .cloned()
            .ok_or(LedgerError::LoanNotFound { loan_id })
    }

    fn commit_repayment(&self, loan: &Loan, receipt: ReceivedRepayment) -> Result<()> {
        // fixed lock order: loans before receipts
        let mut loans = self.loans.write().expect("loan map poisoned");
        let mut receipts = self.receipts.write().expect("receipt map poisoned");

        if !loans.contains_key(&loan.loan_id) {
            return Err(LedgerError::LoanNotFound {
                loan_id: loan.loan_id,
            });
        }
        loans.insert(loan.loan_id, loan.clone());
        receipts.entry(loan.loan_id).or_default().push(receipt);
        Ok(())
    }

    fn receipts(&self, loan_id: LoanId) -> Result<Vec<ReceivedRepayment>> {
        Ok(self
            .receipts
            .read()
            .expect("receipt map poisoned")
            .get(&loan_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::schedule::InstallmentSchedule;
    use crate::types::CurrencyCode;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn test_loan() -> Loan {
        let loan_id = Uuid::new_v4();
        let currency = CurrencyCode::new("EUR");
        let start = Utc.with_ymd_and_hms(2022, 1, 20, 0, 0, 0).unwrap();

        let schedule = InstallmentSchedule::generate(
            loan_id,
            Money::from_minor(5000),
            currency.clone(),
            3,
            start,
        )
        .unwrap();

        Loan::issue(
            loan_id,
            "customer-1".to_string(),
            Money::from_minor(5000),
            currency,
            3,
            start,
            schedule.installments,
        )
    }

    #[test]
    fn test_insert_and_fetch_round_trip() {
        let store = InMemoryLoanStore::new();
        let loan = test_loan();
        let loan_id = loan.loan_id;

        store.insert_loan(loan).unwrap();
        assert_eq!(store.loan_count(), 1);

        let fetched = store.fetch_loan(loan_id).unwrap();
        assert_eq!(fetched.loan_id, loan_id);
        assert_eq!(fetched.installments.len(), 3);
        for pair in fetched.installments.windows(2) {
            assert!(pair[0].due_date < pair[1].due_date);
        }
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = InMemoryLoanStore::new();
        let loan = test_loan();

        store.insert_loan(loan.clone()).unwrap();
        let err = store.insert_loan(loan).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateLoan { .. }));
    }

    #[test]
    fn test_fetch_missing_loan() {
        let store = InMemoryLoanStore::new();
        let err = store.fetch_loan(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, LedgerError::LoanNotFound { .. }));
    }

    #[test]
    fn test_commit_repayment_updates_loan_and_appends_receipt() {
        let store = InMemoryLoanStore::new();
        let mut loan = test_loan();
        let loan_id = loan.loan_id;
        store.insert_loan(loan.clone()).unwrap();

        loan.outstanding_amount = Money::from_minor(3334);
        let receipt = ReceivedRepayment {
            repayment_id: Uuid::new_v4(),
            loan_id,
            amount: Money::from_minor(1666),
            currency: loan.currency.clone(),
            received_at: Utc.with_ymd_and_hms(2022, 2, 20, 0, 0, 0).unwrap(),
        };

        store.commit_repayment(&loan, receipt.clone()).unwrap();

        let fetched = store.fetch_loan(loan_id).unwrap();
        assert_eq!(fetched.outstanding_amount, Money::from_minor(3334));

        let receipts = store.receipts(loan_id).unwrap();
        assert_eq!(receipts, vec![receipt]);
    }

    #[test]
    fn test_commit_repayment_for_unknown_loan_rejected() {
        let store = InMemoryLoanStore::new();
        let loan = test_loan();
        let receipt = ReceivedRepayment {
            repayment_id: Uuid::new_v4(),
            loan_id: loan.loan_id,
            amount: Money::from_minor(1666),
            currency: loan.currency.clone(),
            received_at: Utc.with_ymd_and_hms(2022, 2, 20, 0, 0, 0).unwrap(),
        };

        let err = store.commit_repayment(&loan, receipt).unwrap_err();
        assert!(matches!(err, LedgerError::LoanNotFound { .. }));
        assert!(store.receipts(loan.loan_id).unwrap().is_empty());
    }
}
