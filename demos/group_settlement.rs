//! Group expense settlement example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use settlement_core::utils::MemoryStorage;
use settlement_core::{DateWindow, ExpenseBuilder, GroupLedger, Strategy};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Settlement Core - Weekend Trip Example\n");

    let mut ledger = GroupLedger::new(MemoryStorage::new());
    for member in ["alice", "bob", "charlie", "david"] {
        ledger.add_member("trip", member).await?;
    }

    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).and_then(|d| d.and_hms_opt(12, 0, 0));

    // 1. Record expenses
    let cabin = ExpenseBuilder::new("alice", BigDecimal::from_str("400.00")?)
        .description("Cabin rental")
        .at(day(1).ok_or("invalid date")?)
        .split_equally(["alice", "bob", "charlie", "david"])
        .build()?;
    let fuel = ExpenseBuilder::new("bob", BigDecimal::from_str("85.50")?)
        .description("Fuel")
        .at(day(1).ok_or("invalid date")?)
        .split_equally(["bob", "charlie", "david"])
        .build()?;
    let dinner = ExpenseBuilder::new("charlie", BigDecimal::from_str("120.00")?)
        .description("Dinner")
        .at(day(2).ok_or("invalid date")?)
        .exact("alice", BigDecimal::from_str("40.00")?)
        .exact("david", BigDecimal::from_str("80.00")?)
        .build()?;

    for expense in [cabin, fuel, dinner] {
        let recorded = ledger.record_expense("trip", expense).await?;
        println!(
            "  Recorded: {} paid {} for {}",
            recorded.payer, recorded.total, recorded.description
        );
    }
    println!();

    // 2. Balances
    let balances = ledger
        .calculate_balances("trip", &DateWindow::unbounded())
        .await?;
    println!("Balances:");
    for (participant, balance) in &balances {
        println!("  {:<8} {:>10}", participant, balance);
    }
    println!();

    // 3. Settlement plan
    let report = ledger
        .settle("trip", &DateWindow::unbounded(), Some(Strategy::Greedy))
        .await?;
    println!(
        "Settlement ({} payments, {} saved):",
        report.total_transactions, report.optimization_gain
    );
    for payment in &report.transactions {
        println!("  {} pays {} {}", payment.from, payment.to, payment.amount);
    }

    Ok(())
}
