pub mod allocation;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod money;
pub mod schedule;
pub mod state;
pub mod store;
pub mod types;

// re-export key types
pub use allocation::{Allocation, InstallmentApplication, RepaymentAllocator};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use ledger::{CreateLoanRequest, LoanLedger, RepaymentOutcome, RepaymentRequest};
pub use money::Money;
pub use schedule::InstallmentSchedule;
pub use state::{Loan, ReceivedRepayment, ScheduledInstallment};
pub use store::{InMemoryLoanStore, LoanStore};
pub use types::{
    CurrencyCode, InstallmentId, InstallmentStatus, LoanId, LoanStatus, RepaymentId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use uuid::Uuid;
