//! Net balance aggregation over expense entries

use std::collections::BTreeSet;

use crate::types::*;

/// Fold expense entries into a balance sheet for the given members
///
/// Every member starts at zero so inactive members still appear. Each entry
/// inside `window` credits the payer with the total and debits every split
/// participant with their share. Entries must already be validated; a
/// payer or split participant outside `members` is a consistency error.
pub fn compute_balances(
    entries: &[ExpenseEntry],
    members: &BTreeSet<ParticipantId>,
    window: &DateWindow,
) -> LedgerResult<BalanceSheet> {
    let mut sheet = BalanceSheet::new();
    for member in members {
        sheet.open(member.clone());
    }

    let mut applied = 0usize;
    for entry in entries.iter().filter(|e| window.contains(&e.created_at)) {
        ensure_member(members, entry, &entry.payer)?;
        for split in &entry.splits {
            ensure_member(members, entry, &split.participant)?;
        }

        sheet.credit(&entry.payer, &entry.total);
        for split in &entry.splits {
            sheet.debit(&split.participant, &split.amount);
        }
        applied += 1;
    }

    tracing::debug!(
        members = members.len(),
        entries = entries.len(),
        applied,
        "computed balances"
    );
    Ok(sheet)
}

fn ensure_member(
    members: &BTreeSet<ParticipantId>,
    entry: &ExpenseEntry,
    participant: &ParticipantId,
) -> LedgerResult<()> {
    if members.contains(participant) {
        Ok(())
    } else {
        Err(LedgerError::Consistency {
            entry_id: entry.id.clone(),
            participant: participant.clone(),
        })
    }
}
