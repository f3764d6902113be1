//! Split validation for expense entries

use bigdecimal::BigDecimal;
use std::collections::HashSet;

use crate::types::*;

/// Validate an expense entry before it is accepted
///
/// Checks run in a fixed order and stop at the first failure:
/// positive total, non-empty splits, non-negative shares, unique
/// participants, and finally an exact match between the split sum and
/// the total.
pub fn validate(entry: &ExpenseEntry) -> Result<(), ValidationError> {
    validate_positive_amount(&entry.total)?;

    if entry.splits.is_empty() {
        return Err(ValidationError::EmptySplit);
    }

    let zero = BigDecimal::from(0);
    if entry.splits.iter().any(|split| split.amount < zero) {
        return Err(ValidationError::NegativeSplit);
    }

    let mut seen = HashSet::with_capacity(entry.splits.len());
    for split in &entry.splits {
        if !seen.insert(split.participant.as_str()) {
            return Err(ValidationError::DuplicateParticipant(
                split.participant.clone(),
            ));
        }
    }

    let splits = entry.split_total();
    if splits != entry.total {
        return Err(ValidationError::SplitSumMismatch {
            splits,
            total: entry.total.clone(),
        });
    }

    Ok(())
}

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> Result<(), ValidationError> {
    if *amount <= BigDecimal::from(0) {
        Err(ValidationError::InvalidAmount)
    } else {
        Ok(())
    }
}
