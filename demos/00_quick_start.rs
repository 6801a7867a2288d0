/// quick start - minimal example to get started
use loan_ledger_rs::{
    CreateLoanRequest, CurrencyCode, EventStore, InMemoryLoanStore, LoanLedger, Money,
    RepaymentRequest, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = LoanLedger::new(InMemoryLoanStore::new());
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut events = EventStore::new();

    // issue a 50.00 EUR loan over 3 monthly installments
    let loan = ledger.create_loan(
        CreateLoanRequest {
            customer_id: "customer-42".to_string(),
            principal: Money::from_minor(5000),
            currency: CurrencyCode::new("EUR"),
            term_count: 3,
            processed_at: None,
        },
        &time,
        &mut events,
    )?;

    // repay the first installment
    let outcome = ledger.repay_loan(
        RepaymentRequest {
            loan_id: loan.loan_id,
            amount: Money::from_minor(1666),
            currency: CurrencyCode::new("EUR"),
            received_at: None,
        },
        &time,
        &mut events,
    )?;

    // print current state
    println!("{}", outcome.loan.to_json()?);

    Ok(())
}
