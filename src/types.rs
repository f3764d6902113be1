//! Core types and data structures for the shared-expense ledger

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque, stable participant key (a username or user ID)
pub type ParticipantId = String;

/// How the split amounts of an expense are derived from its total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitType {
    /// Total divided evenly; the last participant absorbs the rounding remainder
    Equal,
    /// Caller supplies every share explicitly
    Exact,
    /// Each participant owes a percentage of the total
    Percentage,
}

/// A participant's assigned share of one expense entry's total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Participant who owes this share
    pub participant: ParticipantId,
    /// Non-negative share of the entry total
    pub amount: BigDecimal,
}

impl Split {
    /// Create a new split
    pub fn new(participant: impl Into<ParticipantId>, amount: BigDecimal) -> Self {
        Self {
            participant: participant.into(),
            amount,
        }
    }
}

/// A recorded expense: who paid, how much, and who owes what
///
/// Entries are immutable once accepted. Build them through
/// [`ExpenseBuilder`](crate::ledger::ExpenseBuilder), which resolves split
/// amounts and runs the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// Unique identifier for the entry
    pub id: String,
    /// Participant who paid the total
    pub payer: ParticipantId,
    /// Positive total paid
    pub total: BigDecimal,
    /// Free-form description of the expense
    pub description: String,
    /// How the split amounts were derived
    pub split_type: SplitType,
    /// Ordered shares, summing exactly to `total`
    pub splits: Vec<Split>,
    /// When the expense occurred
    pub created_at: NaiveDateTime,
}

impl ExpenseEntry {
    /// Sum of all split amounts
    pub fn split_total(&self) -> BigDecimal {
        self.splits.iter().map(|s| &s.amount).sum()
    }

    /// Validate the entry against the split invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::ledger::validation::validate(self)
    }

    /// Number of splits that represent a debt to the payer
    ///
    /// A payer's own share and zero shares do not require a repayment.
    pub fn direct_repayment_count(&self) -> usize {
        let zero = BigDecimal::from(0);
        self.splits
            .iter()
            .filter(|s| s.participant != self.payer && s.amount > zero)
            .count()
    }
}

/// Inclusive time window over entry timestamps; an absent bound is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateWindow {
    /// Window with no bounds on either side
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        Self { from, to }
    }

    /// Window covering whole calendar days, `from` at midnight through the end of `to`
    pub fn from_dates(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from: from.and_then(|d| d.and_hms_opt(0, 0, 0)),
            to: to.and_then(|d| d.and_hms_nano_opt(23, 59, 59, 999_999_999)),
        }
    }

    /// Check whether a timestamp falls inside the window
    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        if let Some(from) = &self.from {
            if at < from {
                return false;
            }
        }
        if let Some(to) = &self.to {
            if at > to {
                return false;
            }
        }
        true
    }
}

/// Net signed balance per participant
///
/// Positive balances are owed to the participant, negative balances are owed
/// by them. Iteration is always in ascending participant order, never in
/// hash order, so every consumer sees the same enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet {
    balances: BTreeMap<ParticipantId, BigDecimal>,
}

impl BalanceSheet {
    /// Create an empty balance sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance for a participant, if present on the sheet
    pub fn get(&self, participant: &str) -> Option<&BigDecimal> {
        self.balances.get(participant)
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.balances.contains_key(participant)
    }

    /// Iterate balances in ascending participant order
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &BigDecimal)> {
        self.balances.iter()
    }

    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.balances.keys()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of every balance on the sheet
    pub fn total(&self) -> BigDecimal {
        self.balances.values().sum()
    }

    /// Check the zero-sum invariant
    pub fn is_zero_sum(&self) -> bool {
        self.total() == BigDecimal::from(0)
    }

    /// Sum of all positive balances, i.e. the volume any full settlement must move
    pub fn outstanding_credit(&self) -> BigDecimal {
        let zero = BigDecimal::from(0);
        self.balances.values().filter(|b| **b > zero).sum()
    }

    /// Produce a new sheet with the given settlements applied
    ///
    /// Each settlement raises the payer's balance and lowers the payee's.
    /// Participants missing from the sheet start at zero.
    pub fn apply(&self, settlements: &[Settlement]) -> BalanceSheet {
        let mut next = self.clone();
        for settlement in settlements {
            next.credit(&settlement.from, &settlement.amount);
            next.debit(&settlement.to, &settlement.amount);
        }
        next
    }

    pub(crate) fn open(&mut self, participant: ParticipantId) {
        self.balances
            .entry(participant)
            .or_insert_with(|| BigDecimal::from(0));
    }

    pub(crate) fn credit(&mut self, participant: &str, amount: &BigDecimal) {
        let balance = self
            .balances
            .entry(participant.to_string())
            .or_insert_with(|| BigDecimal::from(0));
        *balance += amount;
    }

    pub(crate) fn debit(&mut self, participant: &str, amount: &BigDecimal) {
        let balance = self
            .balances
            .entry(participant.to_string())
            .or_insert_with(|| BigDecimal::from(0));
        *balance -= amount;
    }
}

impl FromIterator<(ParticipantId, BigDecimal)> for BalanceSheet {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, BigDecimal)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BalanceSheet {
    type Item = (&'a ParticipantId, &'a BigDecimal);
    type IntoIter = std::collections::btree_map::Iter<'a, ParticipantId, BigDecimal>;

    fn into_iter(self) -> Self::IntoIter {
        self.balances.iter()
    }
}

/// A single proposed payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: BigDecimal,
}

impl Settlement {
    pub fn new(
        from: impl Into<ParticipantId>,
        to: impl Into<ParticipantId>,
        amount: BigDecimal,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Ordering policy used by the settlement matcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Largest debtor against largest creditor, ties broken by participant
    #[default]
    Greedy,
    /// Participant order as enumerated, used as a comparison baseline
    Naive,
}

/// Reasons an expense entry is rejected
///
/// Checks run in declaration order and stop at the first failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("expense amount must be positive")]
    InvalidAmount,
    #[error("expense must have at least one participant")]
    EmptySplit,
    #[error("split amount cannot be negative")]
    NegativeSplit,
    #[error("duplicate participant found in splits: {0}")]
    DuplicateParticipant(ParticipantId),
    #[error("sum of splits does not equal total amount: splits = {splits}, total = {total}")]
    SplitSumMismatch { splits: BigDecimal, total: BigDecimal },
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Data access error: {0}")]
    DataAccess(String),
    #[error("Participant '{participant}' in entry '{entry_id}' is not a member of the group")]
    Consistency {
        entry_id: String,
        participant: ParticipantId,
    },
    #[error("Distribution error: {0}")]
    Distribution(String),
    #[error("Settlement volumes differ: greedy = {greedy}, baseline = {baseline}")]
    VolumeMismatch {
        greedy: BigDecimal,
        baseline: BigDecimal,
    },
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
