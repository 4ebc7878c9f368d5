use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{HOLDING_STATUS_ACTIVE, PREVIOUS_FUNDS_NAME};
use crate::utils::time_utils::deserialize_optional_flexible_date;

/// A single fund position inside a portfolio.
///
/// Field aliases accept the backend's snake_case payload; responses are
/// serialized in camelCase for the display layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    // Core identification
    pub id: i64,
    #[serde(alias = "portfolio_id", default)]
    pub portfolio_id: i64,
    #[serde(alias = "available_funds_id", alias = "fund_id", default)]
    pub fund_id: Option<i64>,
    #[serde(alias = "fund_name", default)]
    pub fund_name: Option<String>,
    #[serde(alias = "isin_number", default)]
    pub isin: Option<String>,

    // Money
    #[serde(alias = "amount_invested", default)]
    pub amount_invested: Decimal,
    #[serde(alias = "market_value", default)]
    pub market_value: Decimal,

    // Latest IRR, as a percentage
    #[serde(alias = "irr_result", default)]
    pub irr: Option<Decimal>,
    #[serde(
        alias = "irr_date",
        alias = "irr_calculation_date",
        default,
        deserialize_with = "deserialize_optional_flexible_date"
    )]
    pub irr_date: Option<NaiveDate>,

    // Lifecycle
    #[serde(default)]
    pub status: Option<String>,
    #[serde(
        alias = "start_date",
        default,
        deserialize_with = "deserialize_optional_flexible_date"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        alias = "end_date",
        default,
        deserialize_with = "deserialize_optional_flexible_date"
    )]
    pub end_date: Option<NaiveDate>,

    // Descriptors used by the CSV export
    #[serde(alias = "portfolio_name", default)]
    pub portfolio_name: Option<String>,
    #[serde(alias = "product_owner", alias = "owner_name", default)]
    pub product_owner: Option<String>,
    #[serde(alias = "fund_type", alias = "product_type", default)]
    pub fund_type: Option<String>,
    #[serde(default)]
    pub weighting: Option<Decimal>,
}

impl Holding {
    /// Fund name for display; empty when the backend sent none.
    pub fn display_name(&self) -> &str {
        self.fund_name.as_deref().unwrap_or_default()
    }

    /// Status for display; an absent status reads as active.
    pub fn display_status(&self) -> &str {
        self.status.as_deref().unwrap_or(HOLDING_STATUS_ACTIVE)
    }
}

/// Fund catalog entry used for name and ISIN lookups.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: i64,
    #[serde(alias = "fund_name")]
    pub fund_name: String,
    #[serde(alias = "isin_number", alias = "isin", default)]
    pub isin_number: Option<String>,
}

/// Traceability link from the synthetic row to one inactive holding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConstituentRef {
    pub holding_id: i64,
    pub fund_id: Option<i64>,
    pub fund_name: Option<String>,
}

/// All inactive holdings of a portfolio folded into one display row.
///
/// Re-derived on every render and never persisted, so it carries no id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviousFundsHolding {
    pub amount_invested: Decimal,
    pub market_value: Decimal,
    /// Approximation, see `consolidation::approximate_combined_irr`.
    pub irr: Option<Decimal>,
    pub irr_date: Option<NaiveDate>,
    pub constituents: Vec<ConstituentRef>,
}

impl PreviousFundsHolding {
    pub fn display_name(&self) -> &'static str {
        PREVIOUS_FUNDS_NAME
    }

    pub fn constituent_ids(&self) -> Vec<i64> {
        self.constituents.iter().map(|c| c.holding_id).collect()
    }
}

/// Active and inactive subsets of one holding set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingPartition {
    pub active: Vec<Holding>,
    pub inactive: Vec<Holding>,
}
