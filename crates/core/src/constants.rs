/// Display name of the synthetic row that folds all inactive holdings together
pub const PREVIOUS_FUNDS_NAME: &str = "Previous Funds";

/// Fund name of the cash-equivalent sleeve that sorts just before the synthetic row
pub const DEFAULT_CASH_FUND_NAME: &str = "Cashline";

/// Holding status that marks a holding as no longer managed
pub const HOLDING_STATUS_INACTIVE: &str = "inactive";

/// Holding status assumed when the backend sends none
pub const HOLDING_STATUS_ACTIVE: &str = "active";

/// Delay between settling an IRR recalculation and refetching the portfolio
pub const DEFAULT_IRR_REFRESH_DELAY_MS: u64 = 1000;

/// Shown when a failed recalculation carries no readable message
pub const GENERIC_RECALCULATION_ERROR: &str = "Failed to recalculate IRR values. Please try again.";

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
