use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::performance::PerformanceView;
use crate::utils::time_utils::deserialize_optional_flexible_date;

/// Latest stored IRR for one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestIrr {
    #[serde(alias = "irr_result")]
    pub irr: Decimal,
    #[serde(
        alias = "irr_date",
        default,
        deserialize_with = "deserialize_optional_flexible_date"
    )]
    pub irr_date: Option<NaiveDate>,
}

/// Outcome of recalculating one fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundIrrStatus {
    Calculated,
    /// The fund already had a value for the requested date.
    Skipped,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundIrrDetail {
    #[serde(alias = "portfolio_fund_id")]
    pub holding_id: i64,
    #[serde(alias = "fund_name", default)]
    pub fund_name: Option<String>,
    pub status: FundIrrStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(alias = "irr_percentage", alias = "irr_result", default)]
    pub irr: Option<Decimal>,
    #[serde(alias = "existing_irr", default)]
    pub existing_irr: Option<Decimal>,
    #[serde(
        alias = "irr_date",
        alias = "date",
        default,
        deserialize_with = "deserialize_optional_flexible_date"
    )]
    pub irr_date: Option<NaiveDate>,
}

/// A fund that could not be calculated because it has no valuation for the date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingValuation {
    #[serde(alias = "portfolio_fund_id", alias = "holding_id")]
    pub holding_id: i64,
    #[serde(alias = "fund_name", default)]
    pub fund_name: Option<String>,
}

impl MissingValuation {
    /// Name shown in the warning; unnamed funds fall back to their holding id.
    pub fn display_name(&self) -> String {
        match self.fund_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Fund {}", self.holding_id),
        }
    }
}

/// Response of a bulk portfolio recalculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrRecalculationResult {
    #[serde(alias = "total_funds", default)]
    pub total_funds: u32,
    #[serde(alias = "successful_calculations", default)]
    pub successful: u32,
    #[serde(alias = "skipped_calculations", default)]
    pub skipped: u32,
    #[serde(alias = "failed_calculations", default)]
    pub failed: u32,
    #[serde(alias = "calculation_details", default)]
    pub details: Vec<FundIrrDetail>,
    #[serde(alias = "missing_valuations", default)]
    pub missing_valuations: Vec<MissingValuation>,
    #[serde(alias = "portfolio_irr", default)]
    pub portfolio_irr: Option<Decimal>,
}

impl IrrRecalculationResult {
    pub fn has_missing_valuations(&self) -> bool {
        !self.missing_valuations.is_empty()
    }

    /// Details of the funds that failed, for surfacing per-fund errors.
    pub fn failures(&self) -> impl Iterator<Item = &FundIrrDetail> {
        self.details
            .iter()
            .filter(|d| d.status == FundIrrStatus::Error)
    }

    pub fn summary(&self) -> String {
        format!(
            "Recalculated {} of {} funds ({} skipped, {} failed)",
            self.successful, self.total_funds, self.skipped, self.failed
        )
    }
}

/// Blocking warning listing the funds that lack a valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingValuationWarning {
    pub fund_names: Vec<String>,
    pub message: String,
}

impl MissingValuationWarning {
    /// `None` when every fund had a valuation.
    pub fn from_result(result: &IrrRecalculationResult) -> Option<Self> {
        if !result.has_missing_valuations() {
            return None;
        }
        let fund_names: Vec<String> = result
            .missing_valuations
            .iter()
            .map(MissingValuation::display_name)
            .collect();
        let message = format!(
            "IRR could not be calculated for funds without a valuation: {}",
            fund_names.join(", ")
        );
        Some(Self {
            fund_names,
            message,
        })
    }
}

/// States of one portfolio's recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RecalculationState {
    Idle,
    DateSelected {
        as_of_date: NaiveDate,
    },
    Calculating {
        as_of_date: NaiveDate,
    },
    Settled {
        settlement: Settlement,
    },
}

impl RecalculationState {
    pub fn is_calculating(&self) -> bool {
        matches!(self, RecalculationState::Calculating { .. })
    }
}

/// How a recalculation request ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Settlement {
    Success {
        result: IrrRecalculationResult,
        summary: String,
    },
    Failed {
        message: String,
    },
}

/// Everything the caller needs after a recalculation settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationOutcome {
    pub portfolio_id: i64,
    pub as_of_date: NaiveDate,
    pub settlement: Settlement,
    /// Shown before the refreshed view when funds lacked valuations.
    pub warning: Option<MissingValuationWarning>,
    /// Refetched view; `None` if the refetch itself failed.
    pub view: Option<PerformanceView>,
}
