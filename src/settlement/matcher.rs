//! Debtor/creditor matching
//!
//! Both strategies share one two-pointer pass; they differ only in how the
//! debtor and creditor lists are ordered before the pass. Greedy matching by
//! magnitude is a heuristic: it usually needs fewer payments than the naive
//! baseline but is not guaranteed to find the minimum.

use bigdecimal::BigDecimal;
use std::cmp::Ordering;

use crate::types::*;

/// Outstanding amount for one side of the matching
#[derive(Debug, Clone, PartialEq, Eq)]
struct Position {
    participant: ParticipantId,
    remaining: BigDecimal,
}

/// Compute the payments that clear every balance on the sheet
///
/// Participants with a zero balance never appear. The result has at most
/// `debtors + creditors - 1` payments and moves exactly the sheet's
/// outstanding credit when the sheet is zero-sum.
pub fn settle(balances: &BalanceSheet, strategy: Strategy) -> Vec<Settlement> {
    let (mut debtors, mut creditors) = partition(balances);

    if strategy == Strategy::Greedy {
        debtors.sort_by(by_magnitude_desc);
        creditors.sort_by(by_magnitude_desc);
    }

    let settlements = match_positions(&mut debtors, &mut creditors);
    tracing::debug!(
        ?strategy,
        debtors = debtors.len(),
        creditors = creditors.len(),
        transactions = settlements.len(),
        "settled balances"
    );
    settlements
}

/// Split the sheet into debtors (by magnitude) and creditors
///
/// Both lists come out in ascending participant order.
fn partition(balances: &BalanceSheet) -> (Vec<Position>, Vec<Position>) {
    let zero = BigDecimal::from(0);
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for (participant, balance) in balances {
        match balance.cmp(&zero) {
            Ordering::Less => debtors.push(Position {
                participant: participant.clone(),
                remaining: balance.abs(),
            }),
            Ordering::Greater => creditors.push(Position {
                participant: participant.clone(),
                remaining: balance.clone(),
            }),
            Ordering::Equal => {}
        }
    }

    (debtors, creditors)
}

fn by_magnitude_desc(a: &Position, b: &Position) -> Ordering {
    b.remaining
        .cmp(&a.remaining)
        .then_with(|| a.participant.cmp(&b.participant))
}

fn match_positions(debtors: &mut [Position], creditors: &mut [Position]) -> Vec<Settlement> {
    let zero = BigDecimal::from(0);
    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let amount = (&debtors[i].remaining).min(&creditors[j].remaining).clone();

        if amount > zero {
            settlements.push(Settlement::new(
                debtors[i].participant.clone(),
                creditors[j].participant.clone(),
                amount.clone(),
            ));
        }

        debtors[i].remaining -= &amount;
        creditors[j].remaining -= &amount;

        if debtors[i].remaining == zero {
            i += 1;
        }
        if creditors[j].remaining == zero {
            j += 1;
        }
    }

    settlements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Strategy;
    use proptest::prelude::*;
    use proptest::strategy::Strategy as _;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn sheet(balances: &[(&str, &str)]) -> BalanceSheet {
        balances
            .iter()
            .map(|(p, b)| (p.to_string(), dec(b)))
            .collect()
    }

    fn volume(settlements: &[Settlement]) -> BigDecimal {
        settlements.iter().map(|s| &s.amount).sum()
    }

    #[test]
    fn test_greedy_matches_largest_first() {
        let balances = sheet(&[
            ("Alice", "100"),
            ("Bob", "50"),
            ("Charlie", "-80"),
            ("David", "-70"),
        ]);

        let result = settle(&balances, Strategy::Greedy);

        assert_eq!(
            result,
            vec![
                Settlement::new("Charlie", "Alice", dec("80")),
                Settlement::new("David", "Alice", dec("20")),
                Settlement::new("David", "Bob", dec("50")),
            ]
        );
        assert_eq!(volume(&result), dec("150"));
    }

    #[test]
    fn test_naive_settles_same_volume() {
        let balances = sheet(&[
            ("Alice", "100"),
            ("Bob", "50"),
            ("Charlie", "-80"),
            ("David", "-70"),
        ]);

        let result = settle(&balances, Strategy::Naive);

        assert_eq!(volume(&result), dec("150"));
        assert!(balances.apply(&result).iter().all(|(_, b)| *b == dec("0")));
    }

    #[test]
    fn test_single_pair() {
        let balances = sheet(&[("A", "10"), ("B", "-10")]);

        for strategy in [Strategy::Greedy, Strategy::Naive] {
            let result = settle(&balances, strategy);
            assert_eq!(result, vec![Settlement::new("B", "A", dec("10"))]);
        }
    }

    #[test]
    fn test_naive_uses_participant_order() {
        let balances = sheet(&[("a", "-1"), ("b", "-5"), ("c", "1"), ("d", "5")]);

        let naive = settle(&balances, Strategy::Naive);
        assert_eq!(
            naive,
            vec![
                Settlement::new("a", "c", dec("1")),
                Settlement::new("b", "d", dec("5")),
            ]
        );

        let greedy = settle(&balances, Strategy::Greedy);
        assert_eq!(
            greedy,
            vec![
                Settlement::new("b", "d", dec("5")),
                Settlement::new("a", "c", dec("1")),
            ]
        );
    }

    #[test]
    fn test_greedy_ties_break_by_participant() {
        let balances = sheet(&[("zed", "-10"), ("amy", "-10"), ("kim", "20")]);

        let result = settle(&balances, Strategy::Greedy);
        assert_eq!(
            result,
            vec![
                Settlement::new("amy", "kim", dec("10")),
                Settlement::new("zed", "kim", dec("10")),
            ]
        );
    }

    #[test]
    fn test_zero_balances_are_excluded() {
        let balances = sheet(&[("a", "0"), ("b", "0.00")]);
        assert!(settle(&balances, Strategy::Greedy).is_empty());
        assert!(settle(&BalanceSheet::new(), Strategy::Naive).is_empty());
    }

    #[test]
    fn test_fractional_amounts() {
        let balances = sheet(&[("a", "33.34"), ("b", "-33.33"), ("c", "-0.01")]);

        let result = settle(&balances, Strategy::Greedy);
        assert_eq!(
            result,
            vec![
                Settlement::new("b", "a", dec("33.33")),
                Settlement::new("c", "a", dec("0.01")),
            ]
        );
    }

    fn zero_sum_sheet() -> impl proptest::strategy::Strategy<Value = BalanceSheet> {
        prop::collection::vec(-100_000i64..100_000i64, 1..12).prop_map(|cents| {
            let offset: i64 = cents.iter().sum();
            let mut balances: Vec<(ParticipantId, BigDecimal)> = cents
                .iter()
                .enumerate()
                .map(|(i, c)| (format!("p{i:02}"), BigDecimal::new((*c).into(), 2)))
                .collect();
            balances.push(("zz".to_string(), BigDecimal::new((-offset).into(), 2)));
            balances.into_iter().collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_settlement_clears_every_balance(balances in zero_sum_sheet()) {
            for strategy in [Strategy::Greedy, Strategy::Naive] {
                let result = settle(&balances, strategy);
                let cleared = balances.apply(&result);

                prop_assert!(cleared.iter().all(|(_, b)| *b == BigDecimal::from(0)));
                prop_assert_eq!(volume(&result), balances.outstanding_credit());
                prop_assert!(result.iter().all(|s| s.amount > BigDecimal::from(0)));
            }
        }

        #[test]
        fn prop_transaction_count_is_bounded(balances in zero_sum_sheet()) {
            let zero = BigDecimal::from(0);
            let nonzero = balances.iter().filter(|(_, b)| **b != zero).count();

            for strategy in [Strategy::Greedy, Strategy::Naive] {
                let result = settle(&balances, strategy);
                prop_assert!(result.len() <= nonzero.saturating_sub(1));
            }
        }
    }
}
