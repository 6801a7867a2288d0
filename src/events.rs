use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{InstallmentId, LoanId};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    LoanIssued {
        loan_id: LoanId,
        customer_id: String,
        principal: Money,
        term_count: u32,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },

    // repayment events
    RepaymentReceived {
        loan_id: LoanId,
        amount: Money,
        outstanding_after: Money,
        timestamp: DateTime<Utc>,
    },
    InstallmentSettled {
        loan_id: LoanId,
        installment_id: InstallmentId,
        sequence: u32,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
