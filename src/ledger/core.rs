//! Group ledger facade that coordinates storage, balances and settlement

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::SettlementConfig;
use crate::ledger::balances::compute_balances;
use crate::settlement::{self, optimization_gain, StrategyComparison};
use crate::traits::*;
use crate::types::*;

/// Settlement plan for one group, as handed to the API layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub strategy: Strategy,
    pub transactions: Vec<Settlement>,
    pub total_transactions: usize,
    pub total_volume: BigDecimal,
    /// Payments saved against repaying every split directly, e.g. `"40.0%"`
    ///
    /// Only splits counted by [`ExpenseEntry::direct_repayment_count`] are
    /// direct repayments: a payer's own share and zero shares are left out.
    pub optimization_gain: String,
    pub balances: BalanceSheet,
}

/// Main entry point for a storage-backed group ledger
///
/// All settlement work happens on a snapshot fetched from storage; storage
/// failures are returned as-is and never retried.
pub struct GroupLedger<S: LedgerStorage> {
    storage: S,
    config: SettlementConfig,
}

impl<S: LedgerStorage> GroupLedger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, SettlementConfig::default())
    }

    pub fn with_config(storage: S, config: SettlementConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Net balance of every member of the group within the window
    pub async fn calculate_balances(
        &self,
        scope_id: &str,
        window: &DateWindow,
    ) -> LedgerResult<BalanceSheet> {
        let (entries, members) = self.snapshot(scope_id, window).await?;
        self.balances_for(scope_id, &entries, &members, window)
    }

    /// Settle the group's balances with the given strategy
    ///
    /// Uses the configured default strategy when `strategy` is `None`.
    pub async fn settle(
        &self,
        scope_id: &str,
        window: &DateWindow,
        strategy: Option<Strategy>,
    ) -> LedgerResult<SettlementReport> {
        let strategy = strategy.unwrap_or(self.config.default_strategy);
        let (entries, members) = self.snapshot(scope_id, window).await?;
        let balances = self.balances_for(scope_id, &entries, &members, window)?;

        let transactions = settlement::settle(&balances, strategy);
        let direct_repayments: usize = entries
            .iter()
            .filter(|e| window.contains(&e.created_at))
            .map(ExpenseEntry::direct_repayment_count)
            .sum();
        let total_volume = transactions.iter().map(|t| &t.amount).sum();

        tracing::info!(
            scope_id,
            ?strategy,
            transactions = transactions.len(),
            direct_repayments,
            "computed settlement plan"
        );

        Ok(SettlementReport {
            strategy,
            total_transactions: transactions.len(),
            optimization_gain: optimization_gain(direct_repayments, transactions.len()),
            total_volume,
            transactions,
            balances,
        })
    }

    /// Compare greedy and naive settlement of the group's balances
    pub async fn compare_strategies(
        &self,
        scope_id: &str,
        window: &DateWindow,
    ) -> LedgerResult<StrategyComparison> {
        let balances = self.calculate_balances(scope_id, window).await?;
        settlement::compare(&balances)
    }

    async fn snapshot(
        &self,
        scope_id: &str,
        window: &DateWindow,
    ) -> LedgerResult<(Vec<ExpenseEntry>, BTreeSet<ParticipantId>)> {
        let entries = self.storage.get_entries(scope_id, window).await?;
        let members = self.storage.get_members(scope_id).await?;
        Ok((entries, members))
    }

    fn balances_for(
        &self,
        scope_id: &str,
        entries: &[ExpenseEntry],
        members: &BTreeSet<ParticipantId>,
        window: &DateWindow,
    ) -> LedgerResult<BalanceSheet> {
        compute_balances(entries, members, window).inspect_err(|err| {
            if let LedgerError::Consistency { .. } = err {
                tracing::warn!(scope_id, error = %err, "expense references a non-member");
            }
        })
    }
}

impl<S: LedgerWriter> GroupLedger<S> {
    /// Add a participant to the group
    pub async fn add_member(&mut self, scope_id: &str, participant: &str) -> LedgerResult<()> {
        self.storage.add_member(scope_id, participant).await
    }

    /// Validate and record an expense for the group
    ///
    /// The payer and every split participant must already be members.
    pub async fn record_expense(
        &mut self,
        scope_id: &str,
        entry: ExpenseEntry,
    ) -> LedgerResult<ExpenseEntry> {
        entry.validate()?;

        let members = self.storage.get_members(scope_id).await?;
        let participants =
            std::iter::once(&entry.payer).chain(entry.splits.iter().map(|s| &s.participant));
        for participant in participants {
            if !members.contains(participant) {
                tracing::warn!(
                    scope_id,
                    entry_id = %entry.id,
                    %participant,
                    "rejected expense for non-member"
                );
                return Err(LedgerError::Consistency {
                    entry_id: entry.id.clone(),
                    participant: participant.clone(),
                });
            }
        }

        self.storage.save_entry(scope_id, &entry).await?;
        tracing::info!(
            scope_id,
            entry_id = %entry.id,
            payer = %entry.payer,
            total = %entry.total,
            splits = entry.splits.len(),
            "recorded expense"
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ExpenseBuilder;
    use crate::utils::memory_storage::MemoryStorage;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    async fn trip_ledger() -> GroupLedger<MemoryStorage> {
        let mut ledger = GroupLedger::new(MemoryStorage::new());
        for member in ["alice", "bob", "carol"] {
            ledger.add_member("trip", member).await.unwrap();
        }
        ledger
    }

    #[tokio::test]
    async fn test_ledger_basic_operations() {
        let mut ledger = trip_ledger().await;

        let dinner = ExpenseBuilder::new("alice", dec("90"))
            .description("Dinner")
            .split_equally(["alice", "bob", "carol"])
            .build()
            .unwrap();
        ledger.record_expense("trip", dinner).await.unwrap();

        let balances = ledger
            .calculate_balances("trip", &DateWindow::unbounded())
            .await
            .unwrap();
        assert_eq!(balances.get("alice"), Some(&dec("60")));
        assert_eq!(balances.get("bob"), Some(&dec("-30")));

        let report = ledger
            .settle("trip", &DateWindow::unbounded(), None)
            .await
            .unwrap();
        assert_eq!(report.strategy, Strategy::Greedy);
        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.total_volume, dec("60"));
        assert_eq!(report.optimization_gain, "0.0%");
    }

    #[tokio::test]
    async fn test_record_expense_rejects_non_member() {
        let mut ledger = trip_ledger().await;

        let entry = ExpenseBuilder::new("alice", dec("20"))
            .id("taxi")
            .exact("dave", dec("20"))
            .build()
            .unwrap();
        let err = ledger.record_expense("trip", entry).await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Consistency { ref participant, .. } if participant == "dave"
        ));
        let stored = ledger
            .storage()
            .get_entries("trip", &DateWindow::unbounded())
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_record_expense_revalidates_entry() {
        let mut ledger = trip_ledger().await;

        let mut entry = ExpenseBuilder::new("alice", dec("20"))
            .exact("bob", dec("20"))
            .build()
            .unwrap();
        entry.splits[0].amount = dec("15");

        let err = ledger.record_expense("trip", entry).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::SplitSumMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_settle_within_window() {
        let mut ledger = trip_ledger().await;
        let jan = |d| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
        };

        let early = ExpenseBuilder::new("alice", dec("30"))
            .at(jan(2))
            .exact("bob", dec("30"))
            .build()
            .unwrap();
        let late = ExpenseBuilder::new("carol", dec("10"))
            .at(jan(20))
            .exact("alice", dec("10"))
            .build()
            .unwrap();
        ledger.record_expense("trip", early).await.unwrap();
        ledger.record_expense("trip", late).await.unwrap();

        let window = DateWindow::from_dates(NaiveDate::from_ymd_opt(2024, 1, 15), None);
        let report = ledger
            .settle("trip", &window, Some(Strategy::Naive))
            .await
            .unwrap();

        assert_eq!(
            report.transactions,
            vec![Settlement::new("alice", "carol", dec("10"))]
        );
        assert_eq!(report.balances.get("bob"), Some(&dec("0")));
    }

    #[tokio::test]
    async fn test_compare_strategies() {
        let mut ledger = trip_ledger().await;
        ledger.add_member("trip", "dave").await.unwrap();

        let entries = [
            ("alice", "100", "carol", "80", "dave", "20"),
            ("bob", "50", "dave", "50", "carol", "0"),
        ];
        for (payer, total, p1, a1, p2, a2) in entries {
            let entry = ExpenseBuilder::new(payer, dec(total))
                .exact(p1, dec(a1))
                .exact(p2, dec(a2))
                .build()
                .unwrap();
            ledger.record_expense("trip", entry).await.unwrap();
        }

        let comparison = ledger
            .compare_strategies("trip", &DateWindow::unbounded())
            .await
            .unwrap();
        assert_eq!(comparison.greedy.total_volume, dec("150"));
        assert_eq!(comparison.baseline.total_volume, dec("150"));
        assert!(comparison.greedy.transaction_count <= 3);
    }

    struct FailingStorage;

    #[async_trait]
    impl LedgerStorage for FailingStorage {
        async fn get_entries(
            &self,
            _scope_id: &str,
            _window: &DateWindow,
        ) -> LedgerResult<Vec<ExpenseEntry>> {
            Err(LedgerError::DataAccess("connection refused".to_string()))
        }

        async fn get_members(&self, _scope_id: &str) -> LedgerResult<BTreeSet<ParticipantId>> {
            Ok(BTreeSet::new())
        }
    }

    #[tokio::test]
    async fn test_storage_errors_propagate_unchanged() {
        let ledger = GroupLedger::new(FailingStorage);

        let err = ledger
            .compare_strategies("trip", &DateWindow::unbounded())
            .await
            .unwrap_err();
        match err {
            LedgerError::DataAccess(message) => assert_eq!(message, "connection refused"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
