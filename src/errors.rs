use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::money::Money;
use crate::types::{CurrencyCode, LoanId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("loan already repaid: {loan_id}")]
    AlreadyRepaid {
        loan_id: LoanId,
    },

    #[error("amount exceeds outstanding: outstanding {outstanding}, requested {requested}")]
    AmountExceedsOutstanding {
        outstanding: Money,
        requested: Money,
    },

    #[error("invalid principal: {amount}")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("invalid term count: {term_count}")]
    InvalidTermCount {
        term_count: u32,
    },

    #[error("invalid repayment amount: {amount}")]
    InvalidRepaymentAmount {
        amount: Money,
    },

    #[error("currency mismatch: expected {expected}, provided {provided}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        provided: CurrencyCode,
    },

    #[error("due date overflow: {months} months past {start_date}")]
    DueDateOverflow {
        start_date: DateTime<Utc>,
        months: u32,
    },

    #[error("loan not found: {loan_id}")]
    LoanNotFound {
        loan_id: LoanId,
    },

    #[error("loan already exists: {loan_id}")]
    DuplicateLoan {
        loan_id: LoanId,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
