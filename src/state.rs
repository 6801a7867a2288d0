use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{
    CurrencyCode, InstallmentId, InstallmentStatus, LoanId, LoanStatus, RepaymentId,
};

/// an installment loan and its schedule
///
/// Invariants maintained by the schedule generator and repayment allocator:
/// the installment amounts sum to `amount`, the installment outstanding
/// balances sum to `outstanding_amount`, and `status` is `Repaid` exactly
/// when `outstanding_amount` is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    // identification
    pub loan_id: LoanId,
    pub customer_id: String,

    // terms
    pub amount: Money,
    pub currency: CurrencyCode,
    pub term_count: u32,
    pub start_date: DateTime<Utc>,

    // balance
    pub outstanding_amount: Money,
    pub status: LoanStatus,

    // schedule, ascending due date
    pub installments: Vec<ScheduledInstallment>,

    // repayment tracking
    pub total_repaid: Money,
    pub repayment_count: u32,
    pub last_repayment_at: Option<DateTime<Utc>>,
}

impl Loan {
    /// assemble a freshly issued loan around its generated schedule
    pub fn issue(
        loan_id: LoanId,
        customer_id: String,
        amount: Money,
        currency: CurrencyCode,
        term_count: u32,
        start_date: DateTime<Utc>,
        installments: Vec<ScheduledInstallment>,
    ) -> Self {
        Self {
            loan_id,
            customer_id,
            amount,
            currency,
            term_count,
            start_date,
            outstanding_amount: amount,
            status: LoanStatus::Due,
            installments,
            total_repaid: Money::ZERO,
            repayment_count: 0,
            last_repayment_at: None,
        }
    }

    /// sum of outstanding balances across the schedule
    pub fn installment_outstanding_total(&self) -> Money {
        self.installments.iter().map(|i| i.outstanding_amount).sum()
    }

    /// check if fully settled
    pub fn is_settled(&self) -> bool {
        self.status == LoanStatus::Repaid
    }

    /// earliest installment that still carries a balance
    pub fn next_due_installment(&self) -> Option<&ScheduledInstallment> {
        self.installments
            .iter()
            .find(|i| i.status != InstallmentStatus::Repaid)
    }

    /// record a successful repayment against the tracking fields
    pub fn record_repayment(&mut self, amount: Money, received_at: DateTime<Utc>) {
        self.total_repaid += amount;
        self.repayment_count += 1;
        self.last_repayment_at = Some(received_at);
    }

    /// serialize to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// deserialize from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// one due obligation within a loan's term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub installment_id: InstallmentId,
    pub loan_id: LoanId,
    /// 1-based position within the schedule
    pub sequence: u32,
    pub amount: Money,
    pub outstanding_amount: Money,
    pub due_date: DateTime<Utc>,
    pub currency: CurrencyCode,
    pub status: InstallmentStatus,
}

/// immutable receipt of money actually received
///
/// Appended once per successful repayment call; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedRepayment {
    pub repayment_id: RepaymentId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub currency: CurrencyCode,
    pub received_at: DateTime<Utc>,
}
