use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::money::Money;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a scheduled installment
pub type InstallmentId = Uuid;

/// unique identifier for a repayment receipt
pub type RepaymentId = Uuid;

/// ISO-4217 style currency code, e.g. "EUR"
///
/// One code per loan; the crate never converts between currencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Self {
        CurrencyCode(code.to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// outstanding balance remains
    Due,
    /// fully settled
    Repaid,
}

impl LoanStatus {
    /// derive status from the loan's outstanding balance
    ///
    /// Pure function of outstanding; the status is never set independently.
    pub fn derive(outstanding: Money) -> Self {
        if outstanding.is_zero() {
            LoanStatus::Repaid
        } else {
            LoanStatus::Due
        }
    }
}

/// scheduled installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// nothing applied yet, outstanding == amount
    Due,
    /// partially applied, 0 < outstanding < amount
    Partial,
    /// fully settled, outstanding == 0
    Repaid,
}

impl InstallmentStatus {
    /// derive status from outstanding and scheduled amount
    ///
    /// Pure function of the pair; re-deriving on unchanged values yields the
    /// same status.
    pub fn derive(outstanding: Money, amount: Money) -> Self {
        if outstanding.is_zero() {
            InstallmentStatus::Repaid
        } else if outstanding < amount {
            InstallmentStatus::Partial
        } else {
            InstallmentStatus::Due
        }
    }
}
