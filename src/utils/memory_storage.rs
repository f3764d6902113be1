//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct Scope {
    members: BTreeSet<ParticipantId>,
    entries: Vec<ExpenseEntry>,
}

/// In-memory storage implementation for testing and development
///
/// Clones share the same underlying data. Entries are returned in the order
/// they were saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    scopes: Arc<RwLock<HashMap<String, Scope>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        self.scopes.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::DataAccess("memory storage lock poisoned".to_string())
}

#[async_trait]
impl LedgerStorage for MemoryStorage {
    async fn get_entries(
        &self,
        scope_id: &str,
        window: &DateWindow,
    ) -> LedgerResult<Vec<ExpenseEntry>> {
        let scopes = self.scopes.read().map_err(poisoned)?;
        Ok(scopes
            .get(scope_id)
            .map(|scope| {
                scope
                    .entries
                    .iter()
                    .filter(|entry| window.contains(&entry.created_at))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_members(&self, scope_id: &str) -> LedgerResult<BTreeSet<ParticipantId>> {
        let scopes = self.scopes.read().map_err(poisoned)?;
        Ok(scopes
            .get(scope_id)
            .map(|scope| scope.members.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl LedgerWriter for MemoryStorage {
    async fn add_member(&mut self, scope_id: &str, participant: &str) -> LedgerResult<()> {
        self.scopes
            .write()
            .map_err(poisoned)?
            .entry(scope_id.to_string())
            .or_default()
            .members
            .insert(participant.to_string());
        Ok(())
    }

    async fn save_entry(&mut self, scope_id: &str, entry: &ExpenseEntry) -> LedgerResult<()> {
        self.scopes
            .write()
            .map_err(poisoned)?
            .entry(scope_id.to_string())
            .or_default()
            .entries
            .push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ExpenseBuilder;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let mut storage = MemoryStorage::new();
        storage.add_member("trip", "alice").await.unwrap();
        storage.add_member("trip", "alice").await.unwrap();
        storage.add_member("flat", "bob").await.unwrap();

        let trip = storage.get_members("trip").await.unwrap();
        assert_eq!(trip.len(), 1);
        assert!(trip.contains("alice"));
        assert!(storage.get_members("unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_entries_filtered_by_window() {
        let mut storage = MemoryStorage::new();
        for day in [1, 10, 20] {
            let entry = ExpenseBuilder::new("alice", BigDecimal::from(10))
                .id(format!("e{day}"))
                .at(NaiveDate::from_ymd_opt(2024, 2, day)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap())
                .exact("alice", BigDecimal::from(10))
                .build()
                .unwrap();
            storage.save_entry("trip", &entry).await.unwrap();
        }

        let window = DateWindow::from_dates(
            NaiveDate::from_ymd_opt(2024, 2, 10),
            NaiveDate::from_ymd_opt(2024, 2, 20),
        );
        let entries = storage.get_entries("trip", &window).await.unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e10", "e20"]);

        storage.clear().unwrap();
        assert!(storage
            .get_entries("trip", &DateWindow::unbounded())
            .await
            .unwrap()
            .is_empty());
    }
}
