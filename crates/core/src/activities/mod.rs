//! Activities module - activity-log models, classification and year windows.

mod activities_constants;
mod activities_model;
mod activity_classifier;
mod period_filter;

pub use activities_constants::*;
pub use activities_model::{ActivityLogEntry, ActivityType};
pub use activity_classifier::{
    investments_plus_switch_ins, total_by_type, value_minus_withdrawals, HoldingCashFlows,
};
pub use crate::utils::time_utils::ActivityTimestamp;
pub use period_filter::{
    activity_years, filter_by_year, monthly_totals, MonthlyActivityGrid, MonthlyTotals,
};
