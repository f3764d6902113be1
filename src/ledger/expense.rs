//! Expense entry construction

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use crate::config::SettlementConfig;
use crate::ledger::distribution::{distribute_equal, distribute_percentage};
use crate::ledger::validation::validate_positive_amount;
use crate::types::*;

/// Builder that resolves split amounts and validates an expense entry
///
/// Participants are kept in insertion order; for derived split types the
/// last participant added absorbs any rounding remainder. Shares of one
/// expense must all use the same split type; mixing them fails in `build`.
#[derive(Debug)]
pub struct ExpenseBuilder {
    id: Option<String>,
    payer: ParticipantId,
    total: BigDecimal,
    description: String,
    created_at: Option<NaiveDateTime>,
    split_type: SplitType,
    shares: Vec<(ParticipantId, Option<BigDecimal>)>,
    mixed_split: Option<(SplitType, SplitType)>,
    currency_scale: i64,
}

impl ExpenseBuilder {
    /// Create a new builder for an expense paid by `payer`
    pub fn new(payer: impl Into<ParticipantId>, total: BigDecimal) -> Self {
        Self {
            id: None,
            payer: payer.into(),
            total,
            description: String::new(),
            created_at: None,
            split_type: SplitType::Exact,
            shares: Vec::new(),
            mixed_split: None,
            currency_scale: SettlementConfig::default().currency_scale,
        }
    }

    /// Use an explicit entry id instead of a generated one
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set when the expense occurred (defaults to now)
    pub fn at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Apply the rounding scale from a settlement config
    pub fn config(mut self, config: &SettlementConfig) -> Self {
        self.currency_scale = config.currency_scale;
        self
    }

    /// Split the total evenly among the given participants, appending to any added before
    pub fn split_equally<I, P>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        self.switch_split_type(SplitType::Equal);
        self.shares.extend(participants.into_iter().map(|p| (p.into(), None)));
        self
    }

    /// Add a participant owing an exact amount
    pub fn exact(mut self, participant: impl Into<ParticipantId>, amount: BigDecimal) -> Self {
        self.switch_split_type(SplitType::Exact);
        self.shares.push((participant.into(), Some(amount)));
        self
    }

    /// Add a participant owing a percentage of the total
    pub fn percentage(mut self, participant: impl Into<ParticipantId>, percent: BigDecimal) -> Self {
        self.switch_split_type(SplitType::Percentage);
        self.shares.push((participant.into(), Some(percent)));
        self
    }

    /// Record the first conflict between the shares added so far and a new split type
    fn switch_split_type(&mut self, split_type: SplitType) {
        let conflicts = !self.shares.is_empty() && self.split_type != split_type;
        if conflicts && self.mixed_split.is_none() {
            self.mixed_split = Some((self.split_type, split_type));
        }
        self.split_type = split_type;
    }

    /// Resolve split amounts and validate the entry
    pub fn build(self) -> LedgerResult<ExpenseEntry> {
        validate_positive_amount(&self.total)?;
        if let Some((first, second)) = self.mixed_split {
            return Err(LedgerError::Distribution(format!(
                "cannot mix {:?} and {:?} shares in one expense",
                first, second
            )));
        }

        let amounts: Vec<BigDecimal> = match self.split_type {
            SplitType::Exact => self
                .shares
                .iter()
                .map(|(_, amount)| amount.clone().unwrap_or_else(|| BigDecimal::from(0)))
                .collect(),
            SplitType::Equal => {
                let participants: Vec<&str> =
                    self.shares.iter().map(|(p, _)| p.as_str()).collect();
                distribute_equal(&self.total, &participants, self.currency_scale)?
            }
            SplitType::Percentage => {
                let percentages: Vec<BigDecimal> = self
                    .shares
                    .iter()
                    .map(|(_, pct)| pct.clone().unwrap_or_else(|| BigDecimal::from(0)))
                    .collect();
                distribute_percentage(&self.total, &percentages, self.currency_scale)?
            }
        };

        let splits = self
            .shares
            .into_iter()
            .zip(amounts)
            .map(|((participant, _), amount)| Split::new(participant, amount))
            .collect();

        let entry = ExpenseEntry {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            payer: self.payer,
            total: self.total,
            description: self.description,
            split_type: self.split_type,
            splits,
            created_at: self
                .created_at
                .unwrap_or_else(|| chrono::Utc::now().naive_utc()),
        };

        entry.validate()?;
        Ok(entry)
    }
}
