//! Contract for the backend collaborator.
//!
//! The engine never owns persistent state. Everything it renders is fetched
//! through this trait, which the client crate implements over HTTP.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::activities::ActivityLogEntry;
use crate::errors::Result;
use crate::portfolio::holdings::{Fund, Holding};
use crate::portfolio::irr::{IrrRecalculationResult, LatestIrr};

/// Which slice of the activity log to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityScope {
    Portfolio(i64),
    Holding(i64),
}

#[async_trait]
pub trait PortfolioDataProvider: Send + Sync {
    async fn get_portfolio_holdings(&self, portfolio_id: i64) -> Result<Vec<Holding>>;

    async fn get_activity_logs(&self, scope: ActivityScope) -> Result<Vec<ActivityLogEntry>>;

    /// `None` when no IRR has been stored for the holding yet.
    async fn get_latest_irr(&self, holding_id: i64) -> Result<Option<LatestIrr>>;

    /// Recomputes the IRR of every fund in the portfolio as of `as_of_date`.
    /// Individual funds report their own outcome; one failure does not abort the rest.
    async fn recalculate_portfolio_irr(
        &self,
        portfolio_id: i64,
        as_of_date: NaiveDate,
    ) -> Result<IrrRecalculationResult>;

    async fn get_fund_catalog(&self) -> Result<Vec<Fund>>;
}
