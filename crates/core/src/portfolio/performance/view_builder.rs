//! Assembles the performance table from holdings and their activity log.

use std::cmp::Ordering;

use chrono::NaiveDate;
use log::debug;

use super::performance_model::{
    FundRow, PerformanceRow, PerformanceView, PerformanceViewOptions, PreviousFundsRow, TotalsRow,
};
use crate::activities::{ActivityLogEntry, HoldingCashFlows};
use crate::portfolio::holdings::{consolidate_previous_funds, partition_holdings, Holding};

/// Builds the ordered rows and the totals row for one portfolio.
///
/// Active holdings become one row each. Inactive holdings are folded into a
/// single "Previous Funds" row if there are any. Totals run over every
/// holding regardless of lifecycle.
pub fn build_performance_view(
    holdings: &[Holding],
    activities: &[ActivityLogEntry],
    today: NaiveDate,
    options: &PerformanceViewOptions,
) -> PerformanceView {
    let partition = partition_holdings(holdings, today);

    let mut rows: Vec<PerformanceRow> = partition
        .active
        .iter()
        .map(|h| PerformanceRow::Fund(FundRow::from_holding(h, activities)))
        .collect();

    if let Some(previous) = consolidate_previous_funds(&partition.inactive) {
        let cash_flows = HoldingCashFlows::for_holdings(activities, &partition.inactive);
        rows.push(PerformanceRow::PreviousFunds(PreviousFundsRow::new(
            previous, cash_flows,
        )));
    }

    sort_rows(&mut rows, &options.cash_fund_name);

    debug!(
        "Built performance view: {} active, {} inactive, {} rows",
        partition.active.len(),
        partition.inactive.len(),
        rows.len()
    );

    PerformanceView {
        as_of_date: today,
        active_count: partition.active.len(),
        inactive_count: partition.inactive.len(),
        rows,
        totals: TotalsRow {
            cash_flows: HoldingCashFlows::for_holdings(activities, holdings),
        },
    }
}

/// Display order: real holdings by fund name, then the cash sleeve, then the
/// synthetic row.
pub fn sort_rows(rows: &mut [PerformanceRow], cash_fund_name: &str) {
    rows.sort_by(|a, b| compare_rows(a, b, cash_fund_name));
}

fn row_rank(row: &PerformanceRow, cash_fund_name: &str) -> u8 {
    match row {
        PerformanceRow::PreviousFunds(_) => 2,
        PerformanceRow::Fund(fund) if is_cash_fund(&fund.fund_name, cash_fund_name) => 1,
        PerformanceRow::Fund(_) => 0,
    }
}

fn is_cash_fund(fund_name: &str, cash_fund_name: &str) -> bool {
    !cash_fund_name.is_empty() && fund_name.trim().eq_ignore_ascii_case(cash_fund_name.trim())
}

fn compare_rows(a: &PerformanceRow, b: &PerformanceRow, cash_fund_name: &str) -> Ordering {
    row_rank(a, cash_fund_name)
        .cmp(&row_rank(b, cash_fund_name))
        .then_with(|| {
            a.fund_name()
                .to_lowercase()
                .cmp(&b.fund_name().to_lowercase())
        })
        .then_with(|| a.fund_name().cmp(b.fund_name()))
        .then_with(|| a.holding_id().cmp(&b.holding_id()))
}
