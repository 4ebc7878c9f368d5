//! Folding inactive holdings into the synthetic "Previous Funds" row.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::holdings_model::{ConstituentRef, Holding, PreviousFundsHolding};

/// Builds the synthetic holding for a portfolio's inactive partition.
///
/// Returns `None` when there is nothing to fold; no placeholder row is produced.
pub fn consolidate_previous_funds(inactive: &[Holding]) -> Option<PreviousFundsHolding> {
    if inactive.is_empty() {
        return None;
    }

    let amount_invested = inactive.iter().map(|h| h.amount_invested).sum();
    let market_value = inactive.iter().map(|h| h.market_value).sum();

    let constituents = inactive
        .iter()
        .map(|h| ConstituentRef {
            holding_id: h.id,
            fund_id: h.fund_id,
            fund_name: h.fund_name.clone(),
        })
        .collect();

    Some(PreviousFundsHolding {
        amount_invested,
        market_value,
        irr: approximate_combined_irr(inactive),
        irr_date: latest_irr_date(inactive),
        constituents,
    })
}

/// Combined IRR shown on the synthetic row: `sum(IRRs) - 100 * count`, over
/// the holdings that have an IRR. `None` when none of them has one.
///
/// This is not a cash-flow-weighted IRR. It reproduces the figure the back
/// office has always displayed for this row.
pub fn approximate_combined_irr(holdings: &[Holding]) -> Option<Decimal> {
    let irrs: Vec<Decimal> = holdings.iter().filter_map(|h| h.irr).collect();
    if irrs.is_empty() {
        return None;
    }

    let sum: Decimal = irrs.iter().copied().sum();
    Some(sum - dec!(100) * Decimal::from(irrs.len()))
}

/// Most recent IRR date among the holdings. A stable descending sort keeps
/// the first of equal dates.
fn latest_irr_date(holdings: &[Holding]) -> Option<chrono::NaiveDate> {
    let mut dated: Vec<&Holding> = holdings.iter().filter(|h| h.irr_date.is_some()).collect();
    dated.sort_by(|a, b| b.irr_date.cmp(&a.irr_date));
    dated.first().and_then(|h| h.irr_date)
}
