//! Distribution of an expense total into participant shares
//!
//! Every distributor rounds half-up to the currency scale for all but the
//! last participant. The last participant absorbs whatever remains, so the
//! shares always sum to the total exactly. Input order decides who absorbs
//! the remainder.

use bigdecimal::{BigDecimal, RoundingMode};

use crate::types::*;

/// Split `total` evenly among `participants`, preserving their order
///
/// Returns an empty list when there are no participants.
pub fn distribute_equal<P: AsRef<str>>(
    total: &BigDecimal,
    participants: &[P],
    scale: i64,
) -> LedgerResult<Vec<BigDecimal>> {
    ensure_non_negative(total)?;
    if participants.is_empty() {
        return Ok(Vec::new());
    }

    let count = BigDecimal::from(participants.len() as u64);
    let base = (total / &count).with_scale_round(scale, RoundingMode::HalfUp);
    let shares = vec![base; participants.len() - 1];

    absorb_remainder(total, shares)
}

/// Split `total` by percentages, preserving their order
///
/// Percentages must be non-negative and sum to exactly 100, so an empty
/// list is rejected.
pub fn distribute_percentage(
    total: &BigDecimal,
    percentages: &[BigDecimal],
    scale: i64,
) -> LedgerResult<Vec<BigDecimal>> {
    ensure_non_negative(total)?;

    let zero = BigDecimal::from(0);
    let hundred = BigDecimal::from(100);
    if percentages.iter().any(|p| *p < zero) {
        return Err(LedgerError::Distribution(
            "percentages cannot be negative".to_string(),
        ));
    }
    let percent_total: BigDecimal = percentages.iter().sum();
    if percent_total != hundred {
        return Err(LedgerError::Distribution(format!(
            "percentages must sum to 100, got {}",
            percent_total
        )));
    }

    let shares = percentages[..percentages.len() - 1]
        .iter()
        .map(|pct| (total * pct / &hundred).with_scale_round(scale, RoundingMode::HalfUp))
        .collect();

    absorb_remainder(total, shares)
}

/// Append the last share as `total` minus everything assigned so far
fn absorb_remainder(total: &BigDecimal, mut shares: Vec<BigDecimal>) -> LedgerResult<Vec<BigDecimal>> {
    let assigned: BigDecimal = shares.iter().sum();
    let last = total - assigned;
    if last < BigDecimal::from(0) {
        return Err(LedgerError::Distribution(format!(
            "rounding leaves a negative final share of {} for a total of {}",
            last, total
        )));
    }

    tracing::trace!(shares = shares.len() + 1, %total, %last, "distributed total");
    shares.push(last);
    Ok(shares)
}

fn ensure_non_negative(total: &BigDecimal) -> LedgerResult<()> {
    if *total < BigDecimal::from(0) {
        return Err(LedgerError::Distribution(format!(
            "cannot distribute a negative total of {}",
            total
        )));
    }
    Ok(())
}
