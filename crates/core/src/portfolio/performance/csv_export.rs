//! CSV export of the performance table.

use csv::{QuoteStyle, WriterBuilder};

use super::performance_model::{PerformanceRow, PerformanceView};
use crate::constants::{DISPLAY_DECIMAL_PRECISION, HOLDING_STATUS_INACTIVE};
use crate::errors::{Error, Result};

pub const EXPORT_HEADERS: [&str; 7] = [
    "Fund Name",
    "Owner",
    "Portfolio",
    "Type",
    "Weighting",
    "Start Date",
    "Status",
];

/// Renders the table rows as CSV. Every field is quoted and embedded quotes
/// are doubled. The synthetic row exports with its display name, an
/// `inactive` status and empty descriptors.
pub fn export_performance_csv(view: &PerformanceView) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;

    for row in &view.rows {
        writer.write_record(export_record(row))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

fn export_record(row: &PerformanceRow) -> [String; 7] {
    match row {
        PerformanceRow::Fund(fund) => [
            fund.fund_name.clone(),
            fund.product_owner.clone().unwrap_or_default(),
            fund.portfolio_name.clone().unwrap_or_default(),
            fund.fund_type.clone().unwrap_or_default(),
            fund.weighting
                .map(|w| w.round_dp(DISPLAY_DECIMAL_PRECISION).to_string())
                .unwrap_or_default(),
            fund.start_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            fund.status.clone(),
        ],
        PerformanceRow::PreviousFunds(previous) => [
            previous.fund_name.clone(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            HOLDING_STATUS_INACTIVE.to_string(),
        ],
    }
}
