//! Calendar-year windows over the activity log, used by the month-by-month
//! review screen.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::activities_model::{ActivityLogEntry, ActivityType};

/// Entries whose timestamp falls inside `year` in the given timezone, in input order.
pub fn filter_by_year(
    activities: &[ActivityLogEntry],
    year: i32,
    tz: Tz,
) -> Vec<ActivityLogEntry> {
    activities
        .iter()
        .filter(|a| a.activity_timestamp.local_year(tz) == year)
        .cloned()
        .collect()
}

/// Distinct years that have at least one entry, most recent first.
pub fn activity_years(activities: &[ActivityLogEntry], tz: Tz) -> Vec<i32> {
    let years: BTreeSet<i32> = activities
        .iter()
        .map(|a| a.activity_timestamp.local_year(tz))
        .collect();
    years.into_iter().rev().collect()
}

/// Twelve monthly `|amount|` sums for one holding and one activity type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub holding_id: i64,
    pub activity_type: String,
    /// Index 0 is January.
    pub months: [Decimal; 12],
    pub total: Decimal,
}

/// Month-by-month view of one year of activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyActivityGrid {
    pub year: i32,
    pub rows: Vec<MonthlyTotals>,
}

impl MonthlyActivityGrid {
    pub fn row(&self, holding_id: i64, activity_type: &ActivityType) -> Option<&MonthlyTotals> {
        self.rows
            .iter()
            .find(|r| r.holding_id == holding_id && r.activity_type == activity_type.as_str())
    }
}

/// Builds the month-by-month grid for `year`. Rows are ordered by holding id,
/// then by activity category; only combinations with entries get a row.
pub fn monthly_totals(activities: &[ActivityLogEntry], year: i32, tz: Tz) -> MonthlyActivityGrid {
    let mut cells: BTreeMap<(i64, ActivityType), [Decimal; 12]> = BTreeMap::new();

    for activity in activities {
        let date = activity.activity_timestamp.local_date(tz);
        if date.year() != year {
            continue;
        }
        let month_index = date.month0() as usize;
        let months = cells
            .entry((activity.holding_id, activity.activity_type.clone()))
            .or_insert([Decimal::ZERO; 12]);
        months[month_index] += activity.amount.abs();
    }

    let rows = cells
        .into_iter()
        .map(|((holding_id, activity_type), months)| MonthlyTotals {
            holding_id,
            activity_type: activity_type.as_str().to_string(),
            total: months.iter().copied().sum(),
            months,
        })
        .collect();

    MonthlyActivityGrid { year, rows }
}
