//! Active/inactive classification of holdings.
//!
//! "Today" is always passed in by the caller so the split is reproducible.

use chrono::NaiveDate;
use log::trace;

use super::holdings_model::{Holding, HoldingPartition};
use crate::constants::HOLDING_STATUS_INACTIVE;

/// A holding is inactive if its status reads "inactive" (any case) or its end
/// date is on or before `today`. Either signal alone is enough.
pub fn is_inactive(holding: &Holding, today: NaiveDate) -> bool {
    let status_inactive = holding
        .status
        .as_deref()
        .map(|s| s.trim().eq_ignore_ascii_case(HOLDING_STATUS_INACTIVE))
        .unwrap_or(false);
    let ended = holding.end_date.is_some_and(|end| end <= today);

    trace!(
        "Holding {} status={:?} end_date={:?} -> inactive={}",
        holding.id,
        holding.status,
        holding.end_date,
        status_inactive || ended
    );

    status_inactive || ended
}

pub fn is_active(holding: &Holding, today: NaiveDate) -> bool {
    !is_inactive(holding, today)
}

/// Splits holdings into active and inactive, preserving input order.
pub fn partition_holdings(holdings: &[Holding], today: NaiveDate) -> HoldingPartition {
    let (inactive, active): (Vec<Holding>, Vec<Holding>) = holdings
        .iter()
        .cloned()
        .partition(|h| is_inactive(h, today));

    HoldingPartition { active, inactive }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn holding(id: i64, status: Option<&str>, end_date: Option<NaiveDate>) -> Holding {
        Holding {
            id,
            status: status.map(str::to_string),
            end_date,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_status_defaults_to_active() {
        assert!(is_active(&holding(1, None, None), today()));
    }

    #[test]
    fn test_inactive_status_is_case_insensitive() {
        assert!(is_inactive(&holding(1, Some("INACTIVE"), None), today()));
        assert!(is_inactive(&holding(2, Some("Inactive"), None), today()));
        assert!(is_active(&holding(3, Some("inactive-pending"), None), today()));
    }

    #[test]
    fn test_inactive_status_wins_over_future_end_date() {
        let future = NaiveDate::from_ymd_opt(2030, 1, 1);
        assert!(is_inactive(&holding(1, Some("inactive"), future), today()));
    }

    #[test]
    fn test_past_end_date_wins_over_active_status() {
        let past = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(is_inactive(&holding(1, Some("active"), past), today()));
    }

    #[test]
    fn test_end_date_today_is_inactive() {
        assert!(is_inactive(&holding(1, None, Some(today())), today()));
        assert!(is_active(&holding(2, None, today().succ_opt()), today()));
    }

    #[test]
    fn test_partition_preserves_order() {
        let past = NaiveDate::from_ymd_opt(2021, 3, 1);
        let holdings = vec![
            holding(1, None, None),
            holding(2, Some("inactive"), None),
            holding(3, Some("active"), None),
            holding(4, None, past),
        ];
        let partition = partition_holdings(&holdings, today());
        let active: Vec<i64> = partition.active.iter().map(|h| h.id).collect();
        let inactive: Vec<i64> = partition.inactive.iter().map(|h| h.id).collect();
        assert_eq!(active, vec![1, 3]);
        assert_eq!(inactive, vec![2, 4]);
    }

    fn arb_holding() -> impl Strategy<Value = Holding> {
        (
            any::<i64>(),
            prop::option::of(prop::sample::select(vec![
                "active", "inactive", "INACTIVE", "closed", "",
            ])),
            prop::option::of(-2000i64..2000),
        )
            .prop_map(|(id, status, offset)| {
                holding(
                    id,
                    status,
                    offset.map(|days| today() + chrono::Duration::days(days)),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_partition_is_total_and_disjoint(
            holdings in prop::collection::vec(arb_holding(), 0..40)
        ) {
            let partition = partition_holdings(&holdings, today());
            prop_assert_eq!(
                partition.active.len() + partition.inactive.len(),
                holdings.len()
            );

            for h in &holdings {
                let in_active = partition.active.contains(h);
                let in_inactive = partition.inactive.contains(h);
                prop_assert!(in_active || in_inactive);
            }
            for h in &partition.active {
                prop_assert!(!is_inactive(h, today()));
            }
            for h in &partition.inactive {
                prop_assert!(is_inactive(h, today()));
            }

            let active_ids: HashSet<i64> = partition.active.iter().map(|h| h.id).collect();
            let unique_ids: HashSet<i64> = holdings.iter().map(|h| h.id).collect();
            if unique_ids.len() == holdings.len() {
                prop_assert!(partition.inactive.iter().all(|h| !active_ids.contains(&h.id)));
            }
        }

        #[test]
        fn prop_inactive_status_always_inactive(offset in prop::option::of(-2000i64..2000)) {
            let end = offset.map(|days| today() + chrono::Duration::days(days));
            prop_assert!(is_inactive(&holding(1, Some("inactive"), end), today()));
        }

        #[test]
        fn prop_past_end_date_always_inactive(
            days_ago in 0i64..5000,
            status in prop::option::of(prop::sample::select(vec!["active", "inactive", "other"])),
        ) {
            let end = Some(today() - chrono::Duration::days(days_ago));
            prop_assert!(is_inactive(&holding(1, status, end), today()));
        }
    }
}
