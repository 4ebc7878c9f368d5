use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::activities_constants::*;
use crate::utils::time_utils::ActivityTimestamp;

/// The six cash-flow categories an activity-log entry can carry.
///
/// Labels the backend sends that match none of them are kept verbatim in
/// `Other` so that decoding never fails; they are ignored by every total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivityType {
    Investment,
    RegularInvestment,
    GovernmentUplift,
    SwitchIn,
    SwitchOut,
    Withdrawal,
    Other(String),
}

impl ActivityType {
    /// The six recognised categories, in display order.
    pub const CATEGORIES: [ActivityType; 6] = [
        ActivityType::Investment,
        ActivityType::RegularInvestment,
        ActivityType::GovernmentUplift,
        ActivityType::SwitchIn,
        ActivityType::SwitchOut,
        ActivityType::Withdrawal,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Investment => ACTIVITY_TYPE_INVESTMENT,
            ActivityType::RegularInvestment => ACTIVITY_TYPE_REGULAR_INVESTMENT,
            ActivityType::GovernmentUplift => ACTIVITY_TYPE_GOVERNMENT_UPLIFT,
            ActivityType::SwitchIn => ACTIVITY_TYPE_SWITCH_IN,
            ActivityType::SwitchOut => ACTIVITY_TYPE_SWITCH_OUT,
            ActivityType::Withdrawal => ACTIVITY_TYPE_WITHDRAWAL,
            ActivityType::Other(label) => label,
        }
    }

    pub fn is_inflow(&self) -> bool {
        !matches!(self, ActivityType::Other(_)) && is_inflow_activity(self.as_str())
    }

    pub fn is_outflow(&self) -> bool {
        !matches!(self, ActivityType::Other(_)) && OUTFLOW_ACTIVITY_TYPES.contains(&self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = std::convert::Infallible;

    /// Matches labels case-insensitively and ignores separators, so
    /// `"Switch In"`, `"switch_in"` and `"SwitchIn"` are the same category.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Ok(match normalized.as_str() {
            "investment" => ActivityType::Investment,
            "regularinvestment" => ActivityType::RegularInvestment,
            "governmentuplift" => ActivityType::GovernmentUplift,
            "switchin" => ActivityType::SwitchIn,
            "switchout" => ActivityType::SwitchOut,
            "withdrawal" => ActivityType::Withdrawal,
            _ => ActivityType::Other(raw.to_string()),
        })
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActivityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ActivityType::from_str(&raw).unwrap_or_else(|never| match never {}))
    }
}

/// One dated financial event against exactly one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: i64,
    #[serde(alias = "portfolio_fund_id", alias = "holding_id")]
    pub holding_id: i64,
    /// Offset-less values are wall-clock time in the reporting timezone.
    #[serde(alias = "activity_timestamp")]
    pub activity_timestamp: ActivityTimestamp,
    #[serde(alias = "activity_type")]
    pub activity_type: ActivityType,
    /// May be signed either way; totals only use its magnitude.
    pub amount: Decimal,
}
