//! Traits for storage abstraction

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::types::*;

/// Read access to recorded expenses and group membership
///
/// This trait allows the settlement core to work with any storage backend
/// (PostgreSQL, SQLite, in-memory, etc.). Implementations report their own
/// failures as [`LedgerError::DataAccess`]; callers propagate them unchanged
/// and never retry.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Expense entries of a scope (e.g. a group), optionally limited to a window
    async fn get_entries(
        &self,
        scope_id: &str,
        window: &DateWindow,
    ) -> LedgerResult<Vec<ExpenseEntry>>;

    /// Authoritative participant set of a scope
    async fn get_members(&self, scope_id: &str) -> LedgerResult<BTreeSet<ParticipantId>>;
}

/// Write path for stores that also accept new members and expenses
#[async_trait]
pub trait LedgerWriter: LedgerStorage {
    /// Add a participant to a scope; adding an existing member is a no-op
    async fn add_member(&mut self, scope_id: &str, participant: &str) -> LedgerResult<()>;

    /// Persist an already validated expense entry
    async fn save_entry(&mut self, scope_id: &str, entry: &ExpenseEntry) -> LedgerResult<()>;
}
