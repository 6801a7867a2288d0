/// repayment lifecycle - issue a loan, walk it to settlement with test time
use loan_ledger_rs::chrono::TimeZone;
use loan_ledger_rs::{
    CreateLoanRequest, CurrencyCode, Event, EventStore, InMemoryLoanStore, LoanLedger, Money,
    RepaymentRequest, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = loan_ledger_rs::chrono::Utc
        .with_ymd_and_hms(2022, 1, 20, 0, 0, 0)
        .unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(start));

    let ledger = LoanLedger::new(InMemoryLoanStore::new());
    let mut events = EventStore::new();

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

    for installment in &loan.installments {
        println!(
            "installment {} of {}: {} due {}",
            installment.sequence,
            loan.term_count,
            installment.amount,
            installment.due_date.date_naive()
        );
    }

    // pay each installment on its due date
    for installment in &loan.installments {
        let outcome = ledger.repay_loan(
            RepaymentRequest {
                loan_id: loan.loan_id,
                amount: installment.amount,
                currency: CurrencyCode::new("EUR"),
                received_at: Some(installment.due_date),
            },
            &time,
            &mut events,
        )?;
        println!(
            "paid {}, outstanding now {}",
            outcome.receipt.amount, outcome.loan.outstanding_amount
        );
    }

    for event in events.take_events() {
        if let Event::LoanSettled { loan_id, timestamp } = event {
            println!("loan {} settled at {}", loan_id, timestamp.date_naive());
        }
    }

    println!("receipts recorded: {}", ledger.receipts(loan.loan_id)?.len());

    Ok(())
}
