//! Activity classification for performance reporting.
//!
//! Totals are built from the magnitude of each entry. The backend does not
//! encode direction consistently in the sign of `amount`, so the category
//! carries the direction instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::activities_model::{ActivityLogEntry, ActivityType};
use crate::portfolio::holdings::Holding;

/// Sum of `|amount|` over the entries of `activity_type` that belong to `holding_id`.
pub fn total_by_type(
    activities: &[ActivityLogEntry],
    activity_type: &ActivityType,
    holding_id: i64,
) -> Decimal {
    activities
        .iter()
        .filter(|a| a.holding_id == holding_id && &a.activity_type == activity_type)
        .map(|a| a.amount.abs())
        .sum()
}

fn total_where(
    activities: &[ActivityLogEntry],
    holding_id: i64,
    include: impl Fn(&ActivityType) -> bool,
) -> Decimal {
    ActivityType::CATEGORIES
        .iter()
        .filter(|t| include(t))
        .map(|t| total_by_type(activities, t, holding_id))
        .sum()
}

/// Investment + RegularInvestment + GovernmentUplift + SwitchIn.
pub fn investments_plus_switch_ins(activities: &[ActivityLogEntry], holding_id: i64) -> Decimal {
    total_where(activities, holding_id, ActivityType::is_inflow)
}

/// Market value + Withdrawal + SwitchOut.
pub fn value_minus_withdrawals(activities: &[ActivityLogEntry], holding: &Holding) -> Decimal {
    holding.market_value + total_where(activities, holding.id, ActivityType::is_outflow)
}

/// Per-holding cash-flow columns of the performance table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingCashFlows {
    pub investment: Decimal,
    pub regular_investment: Decimal,
    pub government_uplift: Decimal,
    pub switch_in: Decimal,
    pub switch_out: Decimal,
    pub withdrawal: Decimal,
    pub investments_plus_switch_ins: Decimal,
    pub amount_invested: Decimal,
    pub market_value: Decimal,
    pub value_minus_withdrawals: Decimal,
}

impl HoldingCashFlows {
    pub fn for_holding(activities: &[ActivityLogEntry], holding: &Holding) -> Self {
        let id = holding.id;
        HoldingCashFlows {
            investment: total_by_type(activities, &ActivityType::Investment, id),
            regular_investment: total_by_type(activities, &ActivityType::RegularInvestment, id),
            government_uplift: total_by_type(activities, &ActivityType::GovernmentUplift, id),
            switch_in: total_by_type(activities, &ActivityType::SwitchIn, id),
            switch_out: total_by_type(activities, &ActivityType::SwitchOut, id),
            withdrawal: total_by_type(activities, &ActivityType::Withdrawal, id),
            investments_plus_switch_ins: investments_plus_switch_ins(activities, id),
            amount_invested: holding.amount_invested,
            market_value: holding.market_value,
            value_minus_withdrawals: value_minus_withdrawals(activities, holding),
        }
    }

    /// Sum of the per-holding metrics over a set of holdings.
    pub fn for_holdings<'a, I>(activities: &[ActivityLogEntry], holdings: I) -> Self
    where
        I: IntoIterator<Item = &'a Holding>,
    {
        holdings
            .into_iter()
            .map(|h| Self::for_holding(activities, h))
            .fold(Self::default(), |acc, flows| acc.add(&flows))
    }

    /// Total for one category column.
    pub fn get(&self, activity_type: &ActivityType) -> Decimal {
        match activity_type {
            ActivityType::Investment => self.investment,
            ActivityType::RegularInvestment => self.regular_investment,
            ActivityType::GovernmentUplift => self.government_uplift,
            ActivityType::SwitchIn => self.switch_in,
            ActivityType::SwitchOut => self.switch_out,
            ActivityType::Withdrawal => self.withdrawal,
            ActivityType::Other(_) => Decimal::ZERO,
        }
    }

    fn add(mut self, other: &Self) -> Self {
        self.investment += other.investment;
        self.regular_investment += other.regular_investment;
        self.government_uplift += other.government_uplift;
        self.switch_in += other.switch_in;
        self.switch_out += other.switch_out;
        self.withdrawal += other.withdrawal;
        self.investments_plus_switch_ins += other.investments_plus_switch_ins;
        self.amount_invested += other.amount_invested;
        self.market_value += other.market_value;
        self.value_minus_withdrawals += other.value_minus_withdrawals;
        self
    }
}
