//! Wealthdesk Core - holdings consolidation and period performance.
//!
//! Turns a portfolio's holdings and activity log into the performance table
//! shown by the back office: lifecycle partitioning, the consolidated
//! "Previous Funds" row, cash-flow totals per activity type, year windows and
//! CSV export. Data is read through [`PortfolioDataProvider`], which the
//! client crate implements over HTTP.

pub mod activities;
pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod utils;

pub use portfolio::{ActivityScope, PortfolioDataProvider};

// Re-export error types
pub use errors::Error;
pub use errors::Result;

#[cfg(test)]
pub(crate) mod test_support;
