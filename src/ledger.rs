use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use uuid::Uuid;

use crate::allocation::{Allocation, RepaymentAllocator};
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::money::Money;
use crate::schedule::InstallmentSchedule;
use crate::state::{Loan, ReceivedRepayment};
use crate::store::LoanStore;
use crate::types::{CurrencyCode, InstallmentStatus, LoanId};

/// loan creation request
///
/// `processed_at` defaults to the time provider's current time.
#[derive(Debug, Clone)]
pub struct CreateLoanRequest {
    pub customer_id: String,
    pub principal: Money,
    pub currency: CurrencyCode,
    pub term_count: u32,
    pub processed_at: Option<DateTime<Utc>>,
}

/// repayment request
///
/// `received_at` defaults to the time provider's current time.
#[derive(Debug, Clone)]
pub struct RepaymentRequest {
    pub loan_id: LoanId,
    pub amount: Money,
    pub currency: CurrencyCode,
    pub received_at: Option<DateTime<Utc>>,
}

/// result of a successful repayment
#[derive(Debug, Clone)]
pub struct RepaymentOutcome {
    pub loan: Loan,
    pub receipt: ReceivedRepayment,
    pub allocation: Allocation,
}

/// installment-loan ledger
///
/// Owns the store and a per-loan lock table. Every repayment runs inside its
/// loan's critical section, so two concurrent repayments against one loan
/// serialize instead of both reading the same outstanding balance.
pub struct LoanLedger<S: LoanStore> {
    store: S,
    locks: Mutex<HashMap<LoanId, Arc<Mutex<()>>>>,
}

impl<S: LoanStore> LoanLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// issue a loan with its amortization schedule
    ///
    /// Creates the loan and all installments as one atomic batch; the loan
    /// starts with status `Due` and outstanding equal to the principal.
    pub fn create_loan(
        &self,
        request: CreateLoanRequest,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Loan> {
        let processed_at = request.processed_at.unwrap_or_else(|| time_provider.now());
        let loan_id = Uuid::new_v4();

        let schedule = InstallmentSchedule::generate(
            loan_id,
            request.principal,
            request.currency.clone(),
            request.term_count,
            processed_at,
        )?;

        let loan = Loan::issue(
            loan_id,
            request.customer_id,
            request.principal,
            request.currency,
            request.term_count,
            processed_at,
            schedule.installments,
        );

        self.store.insert_loan(loan.clone())?;

        events.emit(Event::LoanIssued {
            loan_id,
            customer_id: loan.customer_id.clone(),
            principal: loan.amount,
            term_count: loan.term_count,
            timestamp: processed_at,
        });

        Ok(loan)
    }

    /// apply a repayment to a loan, oldest due installment first
    ///
    /// Rejections (`AlreadyRepaid`, `AmountExceedsOutstanding`, contract
    /// violations) happen before anything is written: the allocation runs on
    /// a fetched copy and only a successful outcome is committed, together
    /// with exactly one receipt.
    pub fn repay_loan(
        &self,
        request: RepaymentRequest,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<RepaymentOutcome> {
        let lock = self.loan_lock(request.loan_id);
        let _guard = lock.lock().expect("loan lock poisoned");

        let mut loan = self.store.fetch_loan(request.loan_id)?;

        if request.currency != loan.currency {
            return Err(LedgerError::CurrencyMismatch {
                expected: loan.currency,
                provided: request.currency,
            });
        }

        let received_at = request.received_at.unwrap_or_else(|| time_provider.now());

        let allocation = RepaymentAllocator::allocate(&mut loan, request.amount)?;
        loan.record_repayment(request.amount, received_at);

        let receipt = ReceivedRepayment {
            repayment_id: Uuid::new_v4(),
            loan_id: loan.loan_id,
            amount: request.amount,
            currency: loan.currency.clone(),
            received_at,
        };

        self.store.commit_repayment(&loan, receipt.clone())?;

        events.emit(Event::RepaymentReceived {
            loan_id: loan.loan_id,
            amount: request.amount,
            outstanding_after: loan.outstanding_amount,
            timestamp: received_at,
        });

        for application in &allocation.applications {
            if application.status_after == InstallmentStatus::Repaid {
                events.emit(Event::InstallmentSettled {
                    loan_id: loan.loan_id,
                    installment_id: application.installment_id,
                    sequence: application.sequence,
                    timestamp: received_at,
                });
            }
        }

        if allocation.settles_loan {
            events.emit(Event::LoanSettled {
                loan_id: loan.loan_id,
                timestamp: received_at,
            });
        }

        Ok(RepaymentOutcome {
            loan,
            receipt,
            allocation,
        })
    }

    /// load a loan
    pub fn loan(&self, loan_id: LoanId) -> Result<Loan> {
        self.store.fetch_loan(loan_id)
    }

    /// receipts recorded against a loan
    pub fn receipts(&self, loan_id: LoanId) -> Result<Vec<ReceivedRepayment>> {
        self.store.receipts(loan_id)
    }

    fn loan_lock(&self, loan_id: LoanId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock table poisoned");
        locks
            .entry(loan_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
