use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::activities::{ActivityLogEntry, HoldingCashFlows, MonthlyActivityGrid};
use crate::constants::{DEFAULT_CASH_FUND_NAME, PREVIOUS_FUNDS_NAME};
use crate::portfolio::holdings::{ConstituentRef, Holding, PreviousFundsHolding};
use crate::utils::time_utils::DEFAULT_REPORTING_TZ;

/// Options that shape the performance table.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceViewOptions {
    /// Fund name of the cash-equivalent sleeve that sorts last among real holdings.
    pub cash_fund_name: String,
    /// Timezone used to read calendar dates off activity timestamps.
    pub timezone: Tz,
}

impl Default for PerformanceViewOptions {
    fn default() -> Self {
        Self {
            cash_fund_name: DEFAULT_CASH_FUND_NAME.to_string(),
            timezone: DEFAULT_REPORTING_TZ,
        }
    }
}

/// One real, active holding in the performance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRow {
    pub holding_id: i64,
    pub fund_id: Option<i64>,
    pub fund_name: String,
    pub isin: Option<String>,
    pub status: String,
    pub irr: Option<Decimal>,
    pub irr_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub product_owner: Option<String>,
    pub portfolio_name: Option<String>,
    pub fund_type: Option<String>,
    pub weighting: Option<Decimal>,
    #[serde(flatten)]
    pub cash_flows: HoldingCashFlows,
}

impl FundRow {
    pub fn from_holding(holding: &Holding, activities: &[ActivityLogEntry]) -> Self {
        FundRow {
            holding_id: holding.id,
            fund_id: holding.fund_id,
            fund_name: holding.display_name().to_string(),
            isin: holding.isin.clone(),
            status: holding.display_status().to_string(),
            irr: holding.irr,
            irr_date: holding.irr_date,
            start_date: holding.start_date,
            product_owner: holding.product_owner.clone(),
            portfolio_name: holding.portfolio_name.clone(),
            fund_type: holding.fund_type.clone(),
            weighting: holding.weighting,
            cash_flows: HoldingCashFlows::for_holding(activities, holding),
        }
    }
}

/// The synthetic row standing in for every inactive holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousFundsRow {
    pub fund_name: String,
    pub irr: Option<Decimal>,
    pub irr_date: Option<NaiveDate>,
    pub constituents: Vec<ConstituentRef>,
    #[serde(flatten)]
    pub cash_flows: HoldingCashFlows,
}

impl PreviousFundsRow {
    pub fn new(holding: PreviousFundsHolding, cash_flows: HoldingCashFlows) -> Self {
        PreviousFundsRow {
            fund_name: PREVIOUS_FUNDS_NAME.to_string(),
            irr: holding.irr,
            irr_date: holding.irr_date,
            constituents: holding.constituents,
            cash_flows,
        }
    }
}

/// A row of the performance table. Serialized with a `rowType` tag
/// (`fund` or `previousFunds`) so consumers can special-case the synthetic row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rowType", rename_all = "camelCase")]
pub enum PerformanceRow {
    Fund(FundRow),
    PreviousFunds(PreviousFundsRow),
}

impl PerformanceRow {
    pub fn fund_name(&self) -> &str {
        match self {
            PerformanceRow::Fund(row) => &row.fund_name,
            PerformanceRow::PreviousFunds(row) => &row.fund_name,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, PerformanceRow::PreviousFunds(_))
    }

    pub fn holding_id(&self) -> Option<i64> {
        match self {
            PerformanceRow::Fund(row) => Some(row.holding_id),
            PerformanceRow::PreviousFunds(_) => None,
        }
    }

    pub fn irr(&self) -> Option<Decimal> {
        match self {
            PerformanceRow::Fund(row) => row.irr,
            PerformanceRow::PreviousFunds(row) => row.irr,
        }
    }

    pub fn cash_flows(&self) -> &HoldingCashFlows {
        match self {
            PerformanceRow::Fund(row) => &row.cash_flows,
            PerformanceRow::PreviousFunds(row) => &row.cash_flows,
        }
    }
}

/// Column totals over every holding of the portfolio, active or not.
/// Carries no IRR.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsRow {
    #[serde(flatten)]
    pub cash_flows: HoldingCashFlows,
}

/// Final, ordered performance table for one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceView {
    pub as_of_date: NaiveDate,
    pub active_count: usize,
    pub inactive_count: usize,
    pub rows: Vec<PerformanceRow>,
    pub totals: TotalsRow,
}

impl PerformanceView {
    pub fn previous_funds(&self) -> Option<&PreviousFundsRow> {
        self.rows.iter().find_map(|row| match row {
            PerformanceRow::PreviousFunds(prev) => Some(prev),
            PerformanceRow::Fund(_) => None,
        })
    }

    pub fn fund_names(&self) -> Vec<&str> {
        self.rows.iter().map(PerformanceRow::fund_name).collect()
    }
}

/// One selected year of activity, with its month-by-month grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearWindow {
    pub year: i32,
    pub available_years: Vec<i32>,
    pub activities: Vec<ActivityLogEntry>,
    pub grid: MonthlyActivityGrid,
}
