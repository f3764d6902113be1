//! Greedy versus naive settlement statistics

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::settlement::matcher::settle;
use crate::types::*;

/// Size of one settlement plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyStats {
    pub transaction_count: usize,
    pub total_volume: BigDecimal,
}

impl StrategyStats {
    pub fn from_settlements(settlements: &[Settlement]) -> Self {
        Self {
            transaction_count: settlements.len(),
            total_volume: settlements.iter().map(|s| &s.amount).sum(),
        }
    }
}

/// Both strategies run over the same balance sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub greedy: StrategyStats,
    pub baseline: StrategyStats,
    /// Reduction in payment count relative to the baseline, e.g. `"33.3%"`
    pub optimization_gain: String,
}

/// Run the greedy and naive matchers over one snapshot and compare them
///
/// Both plans must move the same volume; a difference means the sheet or
/// the matcher broke the zero-sum invariant and is reported as an error.
pub fn compare(balances: &BalanceSheet) -> LedgerResult<StrategyComparison> {
    let greedy = StrategyStats::from_settlements(&settle(balances, Strategy::Greedy));
    let baseline = StrategyStats::from_settlements(&settle(balances, Strategy::Naive));

    if greedy.total_volume != baseline.total_volume {
        return Err(LedgerError::VolumeMismatch {
            greedy: greedy.total_volume,
            baseline: baseline.total_volume,
        });
    }

    let optimization_gain = optimization_gain(baseline.transaction_count, greedy.transaction_count);
    tracing::debug!(
        greedy = greedy.transaction_count,
        baseline = baseline.transaction_count,
        %optimization_gain,
        "compared settlement strategies"
    );

    Ok(StrategyComparison {
        greedy,
        baseline,
        optimization_gain,
    })
}

/// Percentage of payments saved against a reference count, one decimal place
///
/// Never negative; a zero reference count reports `"0%"`.
pub fn optimization_gain(reference_count: usize, optimized_count: usize) -> String {
    if reference_count == 0 {
        return "0%".to_string();
    }

    // tenths of a percent, rounded half-up
    let saved = reference_count.saturating_sub(optimized_count) as u64;
    let reference = reference_count as u64;
    let tenths = (saved * 1000 + reference / 2) / reference;
    format!("{}.{}%", tenths / 10, tenths % 10)
}
