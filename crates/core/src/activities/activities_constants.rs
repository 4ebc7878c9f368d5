/// Activity types
///
/// Each constant is the canonical label of one of the six cash-flow categories
/// an activity-log entry can carry.

/// Lump-sum contribution into a holding.
pub const ACTIVITY_TYPE_INVESTMENT: &str = "Investment";

/// Recurring (e.g. monthly) contribution into a holding.
pub const ACTIVITY_TYPE_REGULAR_INVESTMENT: &str = "RegularInvestment";

/// Government top-up credited to a holding (tax relief, bonus).
pub const ACTIVITY_TYPE_GOVERNMENT_UPLIFT: &str = "GovernmentUplift";

/// Value moved into this holding from another fund.
pub const ACTIVITY_TYPE_SWITCH_IN: &str = "SwitchIn";

/// Value moved out of this holding into another fund.
pub const ACTIVITY_TYPE_SWITCH_OUT: &str = "SwitchOut";

/// Money paid out of the holding to the client.
pub const ACTIVITY_TYPE_WITHDRAWAL: &str = "Withdrawal";

/// Types that add money to a holding
pub const INFLOW_ACTIVITY_TYPES: [&str; 4] = [
    ACTIVITY_TYPE_INVESTMENT,
    ACTIVITY_TYPE_REGULAR_INVESTMENT,
    ACTIVITY_TYPE_GOVERNMENT_UPLIFT,
    ACTIVITY_TYPE_SWITCH_IN,
];

/// Types that take money out of a holding
pub const OUTFLOW_ACTIVITY_TYPES: [&str; 2] = [ACTIVITY_TYPE_SWITCH_OUT, ACTIVITY_TYPE_WITHDRAWAL];

/// Checks if a canonical activity label adds money to a holding.
pub fn is_inflow_activity(activity_type: &str) -> bool {
    INFLOW_ACTIVITY_TYPES.contains(&activity_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_inflow_activity() {
        assert!(is_inflow_activity(ACTIVITY_TYPE_INVESTMENT));
        assert!(is_inflow_activity(ACTIVITY_TYPE_REGULAR_INVESTMENT));
        assert!(is_inflow_activity(ACTIVITY_TYPE_GOVERNMENT_UPLIFT));
        assert!(is_inflow_activity(ACTIVITY_TYPE_SWITCH_IN));
        assert!(!is_inflow_activity(ACTIVITY_TYPE_SWITCH_OUT));
        assert!(!is_inflow_activity(ACTIVITY_TYPE_WITHDRAWAL));
        assert!(!is_inflow_activity("investment")); // lowercase
    }
}
