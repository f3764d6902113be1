//! Greedy versus naive settlement comparison

use bigdecimal::BigDecimal;
use settlement_core::{compare, settle, BalanceSheet, Strategy};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let balances: BalanceSheet = [
        ("alice", 100),
        ("bob", 50),
        ("charlie", -80),
        ("david", -70),
        ("erin", 30),
        ("frank", -30),
    ]
    .into_iter()
    .map(|(name, amount)| (name.to_string(), BigDecimal::from(amount)))
    .collect();

    for strategy in [Strategy::Greedy, Strategy::Naive] {
        println!("{:?}:", strategy);
        for payment in settle(&balances, strategy) {
            println!("  {} -> {}: {}", payment.from, payment.to, payment.amount);
        }
    }

    let comparison = compare(&balances)?;
    println!(
        "\ngreedy: {} payments, baseline: {} payments, volume {}, gain {}",
        comparison.greedy.transaction_count,
        comparison.baseline.transaction_count,
        comparison.greedy.total_volume,
        comparison.optimization_gain
    );

    Ok(())
}
